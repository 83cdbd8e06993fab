//! Output formatting: colours, trace prefixes and the print entry points.

use crate::surface::{DisplaySurface, SurfaceError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid colour `{0}`: expected #rrggbb or a colour name")]
pub struct ParseColorError(pub String);

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if let Some(hex) = t.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(ParseColorError(s.to_string()));
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ParseColorError(s.to_string()))
            };
            return Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?));
        }
        let named = match t.to_ascii_lowercase().as_str() {
            "white" => Rgb::WHITE,
            "black" => Rgb::new(0, 0, 0),
            "red" => Rgb::new(255, 0, 0),
            "green" => Rgb::new(0, 255, 0),
            "blue" => Rgb::new(0, 0, 255),
            "yellow" => Rgb::new(255, 255, 0),
            "cyan" => Rgb::new(0, 255, 255),
            "magenta" => Rgb::new(255, 0, 255),
            "gray" | "grey" => Rgb::new(192, 192, 192),
            _ => return Err(ParseColorError(s.to_string())),
        };
        Ok(named)
    }
}

/// One fragment bound for the display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub text: String,
    pub color: Rgb,
    pub trace: Option<String>,
}

impl OutputLine {
    pub fn new(text: impl Into<String>, color: Rgb) -> Self {
        Self {
            text: text.into(),
            color,
            trace: None,
        }
    }

    pub fn traced(mut self, source: impl Into<String>) -> Self {
        self.trace = Some(source.into());
        self
    }

    /// Final text written to the surface: `source->text` when traced.
    pub fn render(&self) -> String {
        match &self.trace {
            Some(source) => format!("{source}->{}", self.text),
            None => self.text.clone(),
        }
    }

    pub fn emit<S: DisplaySurface + ?Sized>(&self, surface: &mut S) -> Result<(), SurfaceError> {
        surface.append(&self.render(), self.color)
    }
}

/// Print entry points bound to a trace source and a default colour.
#[derive(Debug, Clone)]
pub struct Printer {
    source: String,
    default_color: Rgb,
}

impl Printer {
    pub fn new(source: impl Into<String>, default_color: Rgb) -> Self {
        Self {
            source: source.into(),
            default_color,
        }
    }

    /// Default colour, always traced.
    pub fn print_traced<S: DisplaySurface + ?Sized>(
        &self,
        surface: &mut S,
        text: &str,
    ) -> Result<(), SurfaceError> {
        self.print(surface, text, true, self.default_color)
    }

    pub fn print<S: DisplaySurface + ?Sized>(
        &self,
        surface: &mut S,
        text: &str,
        trace: bool,
        color: Rgb,
    ) -> Result<(), SurfaceError> {
        let mut line = OutputLine::new(text, color);
        if trace {
            line = line.traced(self.source.as_str());
        }
        line.emit(surface)
    }

    pub fn println<S: DisplaySurface + ?Sized>(
        &self,
        surface: &mut S,
        text: &str,
        trace: bool,
    ) -> Result<(), SurfaceError> {
        self.println_colored(surface, text, trace, self.default_color)
    }

    pub fn println_colored<S: DisplaySurface + ?Sized>(
        &self,
        surface: &mut S,
        text: &str,
        trace: bool,
        color: Rgb,
    ) -> Result<(), SurfaceError> {
        self.print(surface, &format!("{text}\n"), trace, color)
    }

    pub fn clear_all<S: DisplaySurface + ?Sized>(&self, surface: &mut S) -> Result<(), SurfaceError> {
        surface.clear_all()
    }
}
