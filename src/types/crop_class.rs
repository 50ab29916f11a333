/// Ground-truth land-cover class for a pixel or label polygon.
/// Variant order is the labeling priority: when a point falls inside
/// polygons of several classes (common at digitized boundaries), the
/// first class in `priority()` wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CropClass {
    Cultivated,     // label 1
    Uncultivated,   // label 0
    Other,          // label 2 (non-field background regions)
}

/// Label value for points contained in no ground-truth polygon.
/// Rows carrying this label are excluded from training.
pub const UNLABELED: i32 = -1;

impl CropClass {
    /// Integer label stored in the `Labels` column.
    #[inline]
    pub fn code(&self) -> i32 {
        match self {
            CropClass::Cultivated => 1,
            CropClass::Uncultivated => 0,
            CropClass::Other => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<CropClass> {
        match code {
            1 => Some(CropClass::Cultivated),
            0 => Some(CropClass::Uncultivated),
            2 => Some(CropClass::Other),
            _ => None,
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            CropClass::Cultivated => "Cultivated",
            CropClass::Uncultivated => "Uncultivated",
            CropClass::Other => "Other",
        }
    }

    /// Classes in labeling priority order.
    pub fn priority() -> [CropClass; 3] {
        [CropClass::Cultivated, CropClass::Uncultivated, CropClass::Other]
    }
}

#[cfg(test)]
mod tests {
    use super::{CropClass, UNLABELED};

    #[test]
    fn codes_round_trip() {
        for class in CropClass::priority() {
            assert_eq!(CropClass::from_code(class.code()), Some(class));
        }
        assert_eq!(CropClass::from_code(UNLABELED), None);
    }

    #[test]
    fn cultivated_wins_priority() {
        assert_eq!(CropClass::priority()[0], CropClass::Cultivated);
    }
}
