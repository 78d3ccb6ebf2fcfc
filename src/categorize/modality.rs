use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// How a school offers approved CS courses, decoded from the leading two
/// characters of its logic code (`1x` = in person, `x1` = virtual).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Both,
    InPerson,
    Virtual,
    NoCourse,
}

impl Modality {
    /// Legend order.
    pub const ALL: [Modality; 4] = [Self::Both, Self::InPerson, Self::Virtual, Self::NoCourse];

    /// Decode a logic code. Anything without a recognised prefix counts as
    /// offering no approved course.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim();
        if code.starts_with("11") { Self::Both }
        else if code.starts_with("10") { Self::InPerson }
        else if code.starts_with("01") { Self::Virtual }
        else { Self::NoCourse }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Self::Both => Rgb::new(0x47, 0xce, 0xf5),
            Self::InPerson => Rgb::new(0xf5, 0x47, 0x77),
            Self::Virtual => Rgb::new(0xff, 0xb3, 0x00),
            Self::NoCourse => Rgb::new(0x63, 0x63, 0x63),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Both => "In Person and Virtual",
            Self::InPerson => "In Person Only",
            Self::Virtual => "Virtual Only",
            Self::NoCourse => "No approved CS Class",
        }
    }

    /// Short label used when the modality is paired with staffing.
    fn short_label(&self) -> &'static str {
        match self {
            Self::Both => "In Person and Virtual",
            Self::InPerson => "In Person",
            Self::Virtual => "Virtual",
            Self::NoCourse => "No CS",
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|m| m == self).unwrap_or(Self::ALL.len() - 1)
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

/// Marker used to draw a school point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Circle,
    Triangle,
}

/// Modality combined with whether the school reports extra CS teachers
/// (last character of the logic code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StaffedModality {
    pub modality: Modality,
    pub extra_teachers: bool,
}

impl StaffedModality {
    /// Legend order: modality first, schools with extra teachers before
    /// those without.
    pub const ALL: [StaffedModality; 8] = [
        Self { modality: Modality::Both, extra_teachers: true },
        Self { modality: Modality::Both, extra_teachers: false },
        Self { modality: Modality::InPerson, extra_teachers: true },
        Self { modality: Modality::InPerson, extra_teachers: false },
        Self { modality: Modality::Virtual, extra_teachers: true },
        Self { modality: Modality::Virtual, extra_teachers: false },
        Self { modality: Modality::NoCourse, extra_teachers: true },
        Self { modality: Modality::NoCourse, extra_teachers: false },
    ];

    /// Decode a logic code whose prefix is one of `11`, `10`, `01`, `00` and
    /// whose last character is `1` or `0`. Other codes are not drawn.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        let modality = match code.get(..2)? {
            "11" => Modality::Both,
            "10" => Modality::InPerson,
            "01" => Modality::Virtual,
            "00" => Modality::NoCourse,
            _ => return None,
        };
        let extra_teachers = match code.chars().last()? {
            '1' => true,
            '0' => false,
            _ => return None,
        };
        Some(Self { modality, extra_teachers })
    }

    #[inline] pub fn color(&self) -> Rgb { self.modality.color() }

    #[inline]
    pub fn marker(&self) -> Marker {
        if self.extra_teachers { Marker::Triangle } else { Marker::Circle }
    }

    pub fn label(&self) -> String {
        let staffing = if self.extra_teachers { "with" } else { "without" };
        format!("{} {staffing} Extra Teachers", self.modality.short_label())
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.modality.index() * 2 + usize::from(!self.extra_teachers)
    }
}
