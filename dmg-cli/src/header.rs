use dmg_core::memory::address;

/// The two cartridge header fields the runner cares about. Nothing here is validated; the
/// header is only read for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartridgeHeader {
    pub title: String,
    pub mapper_byte: u8,
}

impl CartridgeHeader {
    /// Returns `None` if the image is too short to contain a header.
    pub fn parse(rom: &[u8]) -> Option<Self> {
        let title_bytes =
            rom.get(usize::from(address::TITLE_START)..=usize::from(address::TITLE_END))?;
        let mapper_byte = *rom.get(usize::from(address::MAPPER))?;

        let title = title_bytes
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { char::from(b) } else { '?' })
            .collect::<String>()
            .trim_end()
            .to_owned();

        Some(Self { title, mapper_byte })
    }

    /// 0x00 is ROM only; anything else declares a mapper, which is not emulated.
    pub fn declares_mapper(&self) -> bool {
        self.mapper_byte != 0x00
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_with_header(title: &[u8], mapper_byte: u8) -> Vec<u8> {
        let mut rom = vec![0; 0x150];
        rom[0x134..0x134 + title.len()].copy_from_slice(title);
        rom[0x147] = mapper_byte;
        rom
    }

    #[test]
    fn parse_title_and_mapper() {
        let header = CartridgeHeader::parse(&rom_with_header(b"TETRIS", 0x00)).unwrap();
        assert_eq!("TETRIS", header.title);
        assert!(!header.declares_mapper());

        let header = CartridgeHeader::parse(&rom_with_header(b"POKEMON RED", 0x13)).unwrap();
        assert_eq!("POKEMON RED", header.title);
        assert_eq!(0x13, header.mapper_byte);
        assert!(header.declares_mapper());
    }

    #[test]
    fn full_length_title() {
        let header = CartridgeHeader::parse(&rom_with_header(b"ABCDEFGHIJKLMNOP", 0x01)).unwrap();
        assert_eq!("ABCDEFGHIJKLMNOP", header.title);
    }

    #[test]
    fn non_printable_title_bytes() {
        let header = CartridgeHeader::parse(&rom_with_header(b"AB\x80D", 0x00)).unwrap();
        assert_eq!("AB?D", header.title);
    }

    #[test]
    fn short_image_has_no_header() {
        assert_eq!(None, CartridgeHeader::parse(&[0x00; 0x140]));
    }
}
