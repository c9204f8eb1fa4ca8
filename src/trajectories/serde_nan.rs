//! Serde adapters for coordinate arrays that may hold NaN.
//!
//! JSON has no NaN: non-finite values are written as `null` and read back as NaN.
use nalgebra::Point2;
use serde::{Deserialize, Deserializer, Serializer};

fn to_json(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

fn from_json(v: Option<f64>) -> f64 {
    v.unwrap_or(f64::NAN)
}

/// `Vec<f64>` as a JSON array of numbers and `null`s.
pub(crate) mod float_seq {
    use super::*;

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|&v| to_json(v)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values = Vec::<Option<f64>>::deserialize(deserializer)?;
        Ok(values.into_iter().map(from_json).collect())
    }
}

/// `Vec<Point2<f64>>` as a JSON array of `[x, y]` pairs, either coordinate possibly `null`.
pub(crate) mod point_seq {
    use super::*;

    pub fn serialize<S: Serializer>(
        points: &[Point2<f64>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(points.iter().map(|p| [to_json(p.x), to_json(p.y)]))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Point2<f64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pairs = Vec::<[Option<f64>; 2]>::deserialize(deserializer)?;
        Ok(pairs
            .into_iter()
            .map(|[x, y]| Point2::new(from_json(x), from_json(y)))
            .collect())
    }
}

#[cfg(test)]
mod serde_nan_test {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize, serde::Deserialize)]
    struct Track {
        #[serde(with = "float_seq")]
        y: Vec<f64>,
        #[serde(with = "point_seq")]
        points: Vec<Point2<f64>>,
    }

    #[test]
    fn test_nan_written_as_null() {
        let track = Track {
            y: vec![1.0, f64::NAN, 3.0],
            points: vec![Point2::new(1.0, f64::NAN), Point2::new(2.0, 0.5)],
        };
        let json = serde_json::to_string(&track).unwrap();
        assert_eq!(json, r#"{"y":[1.0,null,3.0],"points":[[1.0,null],[2.0,0.5]]}"#);

        let back: Track = serde_json::from_str(&json).unwrap();
        assert_eq!(back.y[0], 1.0);
        assert!(back.y[1].is_nan());
        assert_eq!(back.y[2], 3.0);
        assert_eq!(back.points[0].x, 1.0);
        assert!(back.points[0].y.is_nan());
        assert_eq!(back.points[1], Point2::new(2.0, 0.5));
    }
}
