//! Cartridge image checks
//!
//! The engine is the authority on what it can run. The harness only refuses
//! empty input and reads the iNES header, when there is one, for logging.

use crate::error::{HarnessError, Result};

/// iNES magic: "NES" followed by MS-DOS EOF
const INES_MAGIC: [u8; 4] = *b"NES\x1A";
const INES_HEADER_LEN: usize = 16;
const PRG_BANK_SIZE: usize = 16 * 1024;
const CHR_BANK_SIZE: usize = 8 * 1024;

/// Nametable mirroring declared by an iNES header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

/// Layout described by an iNES header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartInfo {
    pub prg_rom_size: usize,
    pub chr_rom_size: usize,
    pub mapper: u8,
    pub mirroring: Mirroring,
    pub battery: bool,
}

/// A cartridge image accepted for loading
#[derive(Debug, Clone, Copy)]
pub struct Cartridge<'a> {
    bytes: &'a [u8],
    info: Option<CartInfo>,
}

impl<'a> Cartridge<'a> {
    /// Check an image before it is handed to the engine.
    ///
    /// Empty input is rejected. Anything else is accepted; images without an
    /// iNES header are passed through with a warning.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(HarnessError::EmptyCart);
        }
        let info = parse_ines_header(bytes);
        match &info {
            Some(info) => {
                let expected = INES_HEADER_LEN + info.prg_rom_size + info.chr_rom_size;
                if bytes.len() < expected {
                    tracing::warn!(
                        len = bytes.len(),
                        expected,
                        "cartridge image is shorter than its header declares"
                    );
                }
            }
            None => tracing::warn!(len = bytes.len(), "cartridge image has no iNES header"),
        }
        Ok(Self { bytes, info })
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Header details, if the image is iNES
    pub fn info(&self) -> Option<CartInfo> {
        self.info
    }
}

fn parse_ines_header(bytes: &[u8]) -> Option<CartInfo> {
    let header = bytes.get(..INES_HEADER_LEN)?;
    if header[..4] != INES_MAGIC {
        return None;
    }
    let flags6 = header[6];
    let flags7 = header[7];
    let mirroring = if flags6 & 0b1000 != 0 {
        Mirroring::FourScreen
    } else if flags6 & 0b0001 != 0 {
        Mirroring::Vertical
    } else {
        Mirroring::Horizontal
    };
    Some(CartInfo {
        prg_rom_size: header[4] as usize * PRG_BANK_SIZE,
        chr_rom_size: header[5] as usize * CHR_BANK_SIZE,
        mapper: (flags7 & 0xF0) | (flags6 >> 4),
        mirroring,
        battery: flags6 & 0b0010 != 0,
    })
}
