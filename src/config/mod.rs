use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::whitelist::Whitelist;

pub mod basic;
pub mod default;
pub mod relaxed;
pub mod simple;

/// The built-in whitelists a cleaner can start from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Empty,
    Simple,
    Basic,
    BasicWithImages,
    Relaxed,
}

impl Preset {
    /// A fresh copy of the preset's whitelist, free to be customized.
    pub fn whitelist(self) -> Whitelist {
        match self {
            Preset::Empty => Whitelist::new(),
            Preset::Simple => simple::SIMPLE_TEXT.clone(),
            Preset::Basic => basic::BASIC.clone(),
            Preset::BasicWithImages => basic::BASIC_WITH_IMAGES.clone(),
            Preset::Relaxed => relaxed::RELAXED.clone(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Empty => "empty",
            Preset::Simple => "simple",
            Preset::Basic => "basic",
            Preset::BasicWithImages => "basic-with-images",
            Preset::Relaxed => "relaxed",
        }
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(name: &str) -> Result<Preset, Error> {
        match name.to_lowercase().replace('_', "-").as_str() {
            "empty" => Ok(Preset::Empty),
            "simple" => Ok(Preset::Simple),
            "basic" => Ok(Preset::Basic),
            "basic-with-images" => Ok(Preset::BasicWithImages),
            "relaxed" => Ok(Preset::Relaxed),
            _ => Err(Error::UnknownPreset(name.to_owned())),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
