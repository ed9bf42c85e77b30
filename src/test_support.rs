//! Minimal PE32 images built in memory for tests.

const PE_OFFSET: usize = 0x80;
const FILE_ALIGNMENT: usize = 0x200;
const SECTION_ALIGNMENT: usize = 0x1000;
const HEADERS_SIZE: usize = 0x200;
const SECTION_RVA: usize = 0x1000;
const OPTIONAL_HEADER_SIZE: usize = 0xE0;
const IMPORT_DESCRIPTOR_SIZE: usize = 20;
const ORDINAL_FLAG: u32 = 0x8000_0000;

fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) / align * align
}

fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// `#N` names an import by ordinal N, as in module definition files.
fn ordinal(function: &str) -> Option<u16> {
    function.strip_prefix('#')?.parse().ok()
}

/// Build the contents of an `.idata` section mapped at `SECTION_RVA`.
/// Returns the section bytes and the size of the import directory.
fn build_idata(imports: &[(&str, &[&str])]) -> (Vec<u8>, usize) {
    let dir_size = (imports.len() + 1) * IMPORT_DESCRIPTOR_SIZE;
    let mut cursor = dir_size;

    let mut thunks = Vec::with_capacity(imports.len());
    for (_, functions) in imports {
        let table = (functions.len() + 1) * 4;
        let ilt = cursor;
        cursor += table;
        let iat = cursor;
        cursor += table;
        thunks.push((ilt, iat));
    }

    let mut hint_names = Vec::with_capacity(imports.len());
    for (_, functions) in imports {
        let mut offsets = Vec::with_capacity(functions.len());
        for function in functions.iter() {
            offsets.push(cursor);
            if ordinal(function).is_none() {
                cursor = align_up(cursor + 2 + function.len() + 1, 2);
            }
        }
        hint_names.push(offsets);
    }

    let mut dll_names = Vec::with_capacity(imports.len());
    for (dll, _) in imports {
        dll_names.push(cursor);
        cursor += dll.len() + 1;
    }

    let rva = |offset: usize| (SECTION_RVA + offset) as u32;
    let mut section = vec![0u8; cursor];
    for (i, (dll, functions)) in imports.iter().enumerate() {
        let descriptor = i * IMPORT_DESCRIPTOR_SIZE;
        let (ilt, iat) = thunks[i];
        put_u32(&mut section, descriptor, rva(ilt));
        put_u32(&mut section, descriptor + 12, rva(dll_names[i]));
        put_u32(&mut section, descriptor + 16, rva(iat));

        for (j, function) in functions.iter().enumerate() {
            if let Some(number) = ordinal(function) {
                put_u32(&mut section, ilt + j * 4, ORDINAL_FLAG | u32::from(number));
                put_u32(&mut section, iat + j * 4, ORDINAL_FLAG | u32::from(number));
                continue;
            }

            let hint_name = hint_names[i][j];
            put_u32(&mut section, ilt + j * 4, rva(hint_name));
            put_u32(&mut section, iat + j * 4, rva(hint_name));
            let name_start = hint_name + 2;
            section[name_start..name_start + function.len()].copy_from_slice(function.as_bytes());
        }

        let name_start = dll_names[i];
        section[name_start..name_start + dll.len()].copy_from_slice(dll.as_bytes());
    }

    (section, dir_size)
}

/// A valid 32-bit console executable with one `.idata` section importing
/// the given functions. A function written `#N` is imported by ordinal N.
/// An empty slice yields an image without an import directory.
pub(crate) fn pe_with_imports(imports: &[(&str, &[&str])]) -> Vec<u8> {
    let (idata, dir_size) = build_idata(imports);
    let raw_size = align_up(idata.len().max(1), FILE_ALIGNMENT);
    let image_size = SECTION_RVA + align_up(raw_size, SECTION_ALIGNMENT);

    let mut image = vec![0u8; HEADERS_SIZE + raw_size];

    // DOS header
    image[0..2].copy_from_slice(b"MZ");
    put_u32(&mut image, 0x3C, PE_OFFSET as u32);

    // PE signature and COFF header
    image[PE_OFFSET..PE_OFFSET + 4].copy_from_slice(b"PE\0\0");
    let coff = PE_OFFSET + 4;
    put_u16(&mut image, coff, 0x014C); // i386
    put_u16(&mut image, coff + 2, 1);
    put_u16(&mut image, coff + 16, OPTIONAL_HEADER_SIZE as u16);
    put_u16(&mut image, coff + 18, 0x0102); // executable, 32-bit machine

    // Optional header, PE32
    let opt = coff + 20;
    put_u16(&mut image, opt, 0x010B);
    image[opt + 2] = 14;
    put_u32(&mut image, opt + 8, raw_size as u32);
    put_u32(&mut image, opt + 16, SECTION_RVA as u32);
    put_u32(&mut image, opt + 20, SECTION_RVA as u32);
    put_u32(&mut image, opt + 24, SECTION_RVA as u32);
    put_u32(&mut image, opt + 28, 0x0040_0000);
    put_u32(&mut image, opt + 32, SECTION_ALIGNMENT as u32);
    put_u32(&mut image, opt + 36, FILE_ALIGNMENT as u32);
    put_u16(&mut image, opt + 40, 6);
    put_u16(&mut image, opt + 48, 6);
    put_u32(&mut image, opt + 56, image_size as u32);
    put_u32(&mut image, opt + 60, HEADERS_SIZE as u32);
    put_u16(&mut image, opt + 68, 3); // console subsystem
    put_u16(&mut image, opt + 70, 0x8140);
    put_u32(&mut image, opt + 72, 0x0010_0000);
    put_u32(&mut image, opt + 76, 0x1000);
    put_u32(&mut image, opt + 80, 0x0010_0000);
    put_u32(&mut image, opt + 84, 0x1000);
    put_u32(&mut image, opt + 92, 16);

    // Data directory 1: import table
    if !imports.is_empty() {
        let import_dir = opt + 96 + 8;
        put_u32(&mut image, import_dir, SECTION_RVA as u32);
        put_u32(&mut image, import_dir + 4, dir_size as u32);
    }

    // Section table
    let section = opt + OPTIONAL_HEADER_SIZE;
    image[section..section + 6].copy_from_slice(b".idata");
    put_u32(&mut image, section + 8, raw_size as u32);
    put_u32(&mut image, section + 12, SECTION_RVA as u32);
    put_u32(&mut image, section + 16, raw_size as u32);
    put_u32(&mut image, section + 20, HEADERS_SIZE as u32);
    put_u32(&mut image, section + 36, 0xC000_0040); // initialized data, read/write

    image[HEADERS_SIZE..HEADERS_SIZE + idata.len()].copy_from_slice(&idata);
    image
}

/// A PE image cut off in the middle of its headers.
pub(crate) fn truncated_pe() -> Vec<u8> {
    let mut image = pe_with_imports(&[("KERNEL32.dll", &["VirtualAlloc"])]);
    image.truncate(PE_OFFSET + 40);
    image
}
