//! Closed set of record tags the extractor understands

/// Recognized tag kinds; everything else is [`TagKind::Unknown`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// BIRT
    Birth,
    /// BAPM, BAPL
    Baptism,
    /// CHR
    Christening,
    /// PLAC
    Place,
    /// OCCU, PROF
    Occupation,
    /// `_OCCU`, `_OCCUPATION` and similar vendor extensions
    CustomOccupation,
    /// TITL: honorifics and nobility, not work
    Title,
    /// NOTE, TEXT, DATA: free-text carriers
    FreeText,
    /// CENS, RESI, EVEN, FACT: events whose sub-fields may record an occupation
    Event,
    /// SOUR: citations, which may carry transcribed text
    Source,
    Unknown,
}

impl TagKind {
    pub fn of(tag: &str) -> Self {
        match tag {
            "BIRT" => Self::Birth,
            "BAPM" | "BAPL" => Self::Baptism,
            "CHR" => Self::Christening,
            "PLAC" => Self::Place,
            "OCCU" | "PROF" => Self::Occupation,
            "TITL" => Self::Title,
            "NOTE" | "TEXT" | "DATA" => Self::FreeText,
            "CENS" | "RESI" | "EVEN" | "FACT" => Self::Event,
            "SOUR" => Self::Source,
            custom if custom.starts_with("_OCCU") => Self::CustomOccupation,
            _ => Self::Unknown,
        }
    }

    /// Birth, baptism or christening
    pub fn is_birth_event(self) -> bool {
        matches!(self, Self::Birth | Self::Baptism | Self::Christening)
    }

    pub fn is_occupation(self) -> bool {
        matches!(self, Self::Occupation | Self::CustomOccupation)
    }
}
