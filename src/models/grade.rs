use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Grade
// ---------------------------------------------------------------------------

/// A grading tier under which a card has a distinct market price.
///
/// The declaration order is the column order used everywhere: table display,
/// totals and CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Grade {
    Ungraded,
    Grade1,
    Grade2,
    Grade3,
    Grade4,
    Grade5,
    Grade6,
    Grade7,
    Grade8,
    Grade9,
    Grade9Half,
    Sgc10,
    Cgc10,
    Psa10,
    Bgs10,
    Bgs10Black,
    Cgc10Pristine,
}

impl Grade {
    pub const COUNT: usize = 17;

    pub const ALL: [Grade; Grade::COUNT] = [
        Grade::Ungraded,
        Grade::Grade1,
        Grade::Grade2,
        Grade::Grade3,
        Grade::Grade4,
        Grade::Grade5,
        Grade::Grade6,
        Grade::Grade7,
        Grade::Grade8,
        Grade::Grade9,
        Grade::Grade9Half,
        Grade::Sgc10,
        Grade::Cgc10,
        Grade::Psa10,
        Grade::Bgs10,
        Grade::Bgs10Black,
        Grade::Cgc10Pristine,
    ];

    /// The label used as the JSON column key and CSV header.
    pub fn label(self) -> &'static str {
        match self {
            Grade::Ungraded => "Ungraded",
            Grade::Grade1 => "Grade 1",
            Grade::Grade2 => "Grade 2",
            Grade::Grade3 => "Grade 3",
            Grade::Grade4 => "Grade 4",
            Grade::Grade5 => "Grade 5",
            Grade::Grade6 => "Grade 6",
            Grade::Grade7 => "Grade 7",
            Grade::Grade8 => "Grade 8",
            Grade::Grade9 => "Grade 9",
            Grade::Grade9Half => "Grade 9.5",
            Grade::Sgc10 => "SGC 10",
            Grade::Cgc10 => "CGC 10",
            Grade::Psa10 => "PSA 10",
            Grade::Bgs10 => "BGS 10",
            Grade::Bgs10Black => "BGS 10 Black",
            Grade::Cgc10Pristine => "CGC 10 Pristine",
        }
    }

    /// Look up a grade by its label (exact, case-insensitive).
    pub fn from_label(label: &str) -> Option<Grade> {
        let wanted = label.trim();
        Grade::ALL
            .iter()
            .copied()
            .find(|g| g.label().eq_ignore_ascii_case(wanted))
    }

    /// Position of this grade in [`Grade::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Grade::from_label(s).ok_or_else(|| format!("unknown grade: {}", s))
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Grade {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Grade::from_label(&s).ok_or_else(|| serde::de::Error::custom(format!("unknown grade: {}", s)))
    }
}

// ---------------------------------------------------------------------------
// GradeMap
// ---------------------------------------------------------------------------

/// Dense per-grade storage indexed by [`Grade`].
#[derive(Debug, Clone, PartialEq)]
pub struct GradeMap<T> {
    values: [T; Grade::COUNT],
}

impl<T: Default> Default for GradeMap<T> {
    fn default() -> Self {
        Self {
            values: std::array::from_fn(|_| T::default()),
        }
    }
}

impl<T> GradeMap<T> {
    pub fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        Self {
            values: std::array::from_fn(f),
        }
    }

    pub fn get(&self, grade: Grade) -> &T {
        &self.values[grade.index()]
    }

    pub fn set(&mut self, grade: Grade, value: T) {
        self.values[grade.index()] = value;
    }

    pub fn get_mut(&mut self, grade: Grade) -> &mut T {
        &mut self.values[grade.index()]
    }

    /// Iterate `(grade, value)` pairs in grade order.
    pub fn iter(&self) -> impl Iterator<Item = (Grade, &T)> {
        Grade::ALL.iter().copied().zip(self.values.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }
}

impl<T> std::ops::Index<Grade> for GradeMap<T> {
    type Output = T;

    fn index(&self, grade: Grade) -> &T {
        self.get(grade)
    }
}

impl<T: Serialize> Serialize for GradeMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(Grade::COUNT))?;
        for (grade, value) in self.iter() {
            map.serialize_entry(grade.label(), value)?;
        }
        map.end()
    }
}
