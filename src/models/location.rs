use serde::Serialize;
use std::cmp::Reverse;
use std::fmt;
use validator::Validate;

use crate::error::Result;
use crate::utils::filename::tag_from_url;

/// Sentinel code used for every axis character outside the recognized set.
pub const UNRECOGNIZED: i32 = -1;

/// Time-averaging class, position 2 + 3 of the collection code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimeAverage {
    Instantaneous,
    OneHour,
    ThreeHour,
    SixHour,
    /// Longer-term averages; not usable for trajectories.
    Unrecognized,
}

impl TimeAverage {
    pub fn code(&self) -> i32 {
        match self {
            TimeAverage::Instantaneous => 0,
            TimeAverage::OneHour => 1,
            TimeAverage::ThreeHour => 3,
            TimeAverage::SixHour => 6,
            TimeAverage::Unrecognized => UNRECOGNIZED,
        }
    }

    pub fn priority_rank(&self) -> u32 {
        match self {
            TimeAverage::Instantaneous => 4,
            TimeAverage::OneHour => 3,
            TimeAverage::ThreeHour => 2,
            TimeAverage::SixHour => 1,
            TimeAverage::Unrecognized => 0,
        }
    }
}

/// Horizontal grid, position 4 of the collection code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HorizontalGrid {
    /// 2/3 x 1/2 degree
    Native,
    /// 1.25 x 1.25 degree
    Reduced,
    /// 1.25 x 1 degree (FV)
    ReducedFv,
    Unrecognized,
}

impl HorizontalGrid {
    pub fn from_char(c: Option<char>) -> Self {
        match c {
            Some('N') => HorizontalGrid::Native,
            Some('C') => HorizontalGrid::Reduced,
            Some('F') => HorizontalGrid::ReducedFv,
            _ => HorizontalGrid::Unrecognized,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            HorizontalGrid::Native => 0,
            HorizontalGrid::Reduced => 1,
            HorizontalGrid::ReducedFv => 2,
            HorizontalGrid::Unrecognized => UNRECOGNIZED,
        }
    }

    pub fn priority_rank(&self) -> u32 {
        match self {
            HorizontalGrid::Native => 3,
            HorizontalGrid::Reduced => 2,
            HorizontalGrid::ReducedFv => 1,
            HorizontalGrid::Unrecognized => 0,
        }
    }
}

/// Vertical coordinate, position 5 of the collection code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VerticalCoord {
    /// 2D data, no vertical axis
    Surface,
    ModelLevels,
    PressureLevels,
    LayerEdges,
    Unrecognized,
}

impl VerticalCoord {
    pub fn from_char(c: Option<char>) -> Self {
        match c {
            Some('X') => VerticalCoord::Surface,
            Some('V') => VerticalCoord::ModelLevels,
            Some('P') => VerticalCoord::PressureLevels,
            Some('E') => VerticalCoord::LayerEdges,
            _ => VerticalCoord::Unrecognized,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            VerticalCoord::Surface => 0,
            VerticalCoord::ModelLevels => 1,
            VerticalCoord::PressureLevels => 2,
            VerticalCoord::LayerEdges => 3,
            VerticalCoord::Unrecognized => UNRECOGNIZED,
        }
    }

    /// Pressure levels first, then model levels, 2D, layer edges.
    pub fn priority_rank(&self) -> u32 {
        match self {
            VerticalCoord::PressureLevels => 4,
            VerticalCoord::ModelLevels => 3,
            VerticalCoord::Surface => 2,
            VerticalCoord::LayerEdges => 1,
            VerticalCoord::Unrecognized => 0,
        }
    }
}

/// One place (server root, collection, file tag) where a quantity can be found.
///
/// Every classification field is decoded from `collection_code` when the
/// location is constructed. There are no setters: a different code means a
/// different location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Validate)]
pub struct LocationCode {
    base_url: String,

    #[validate(length(min = 6))]
    collection_code: String,

    tag: String,

    config: char,
    time_average: TimeAverage,
    /// minutes after 00:00 UTC
    time_base_offset: u32,
    /// hours between snapshots; 0 = constant, -1 = other
    time_spacing: i32,
    horizontal_grid: HorizontalGrid,
    vertical_coord: VerticalCoord,
}

impl LocationCode {
    pub fn new(
        base_url: impl Into<String>,
        collection_code: impl Into<String>,
        tag: impl Into<String>,
    ) -> Result<Self> {
        let collection_code = collection_code.into();
        let chars: Vec<char> = collection_code.chars().collect();
        let at = |i: usize| chars.get(i).copied();

        let (time_average, time_base_offset, time_spacing) = decode_time(at(2), at(3));

        let location = Self {
            base_url: base_url.into(),
            tag: tag.into(),
            config: at(1).unwrap_or(' '),
            time_average,
            time_base_offset,
            time_spacing,
            horizontal_grid: HorizontalGrid::from_char(at(4)),
            vertical_coord: VerticalCoord::from_char(at(5)),
            collection_code,
        };

        location.validate()?;
        Ok(location)
    }

    /// Build a location whose tag is taken from the URL of one of its files
    pub fn from_file_url(
        base_url: impl Into<String>,
        collection_code: impl Into<String>,
        file_url: &str,
    ) -> Result<Self> {
        Self::new(base_url, collection_code, tag_from_url(file_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn collection_code(&self) -> &str {
        &self.collection_code
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// 'A' assimilation, 'F' forecast, 'S' simulation; anything else is kept as-is
    pub fn config(&self) -> char {
        self.config
    }

    pub fn time_average(&self) -> TimeAverage {
        self.time_average
    }

    pub fn time_base_offset(&self) -> u32 {
        self.time_base_offset
    }

    pub fn time_spacing(&self) -> i32 {
        self.time_spacing
    }

    pub fn horizontal_grid(&self) -> HorizontalGrid {
        self.horizontal_grid
    }

    pub fn vertical_coord(&self) -> VerticalCoord {
        self.vertical_coord
    }

    /// A location may feed the catalog only when grid, vertical coordinate
    /// and time averaging were all recognized.
    pub fn is_catalogable(&self) -> bool {
        self.horizontal_grid != HorizontalGrid::Unrecognized
            && self.vertical_coord != VerticalCoord::Unrecognized
            && self.time_average != TimeAverage::Unrecognized
    }

    pub fn priority(&self) -> LocationPriority {
        LocationPriority::from(self)
    }

    /// True when both refer to the same (base url, collection, tag) triple
    pub fn same_place(&self, other: &LocationCode) -> bool {
        self.base_url == other.base_url
            && self.collection_code == other.collection_code
            && self.tag == other.tag
    }
}

impl fmt::Display for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.base_url, self.collection_code, self.tag)
    }
}

fn decode_time(timedesc: Option<char>, freq: Option<char>) -> (TimeAverage, u32, i32) {
    match (timedesc, freq) {
        (Some('T'), Some('1')) => (TimeAverage::OneHour, 30, 1),
        (Some('T'), Some('3')) => (TimeAverage::ThreeHour, 90, 3),
        (Some('T'), Some('6')) => (TimeAverage::SixHour, 180, 6),
        (Some('T'), _) => (TimeAverage::Unrecognized, 0, -1),
        (Some('I'), Some('1')) => (TimeAverage::Instantaneous, 0, 1),
        (Some('I'), Some('3')) => (TimeAverage::Instantaneous, 0, 3),
        (Some('I'), Some('6')) => (TimeAverage::Instantaneous, 0, 6),
        (Some('I'), _) => (TimeAverage::Instantaneous, 0, -1),
        // constant ('C')
        _ => (TimeAverage::Instantaneous, 0, 0),
    }
}

/// Ranking key used to order the locations of one quantity. Larger is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocationPriority(u32);

impl From<&LocationCode> for LocationPriority {
    fn from(location: &LocationCode) -> Self {
        let vertical = location.vertical_coord.priority_rank();
        let horizontal = location.horizontal_grid.priority_rank();
        let average = location.time_average.priority_rank();

        LocationPriority((vertical * 100 + horizontal) * 100 + average)
    }
}

/// Sort best-first. Stable, so equal keys keep their encounter order.
pub fn sort_by_priority(locations: &mut [LocationCode]) {
    locations.sort_by_key(|l| Reverse(l.priority()));
}
