use derive_more::{Display, Into};

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(0..1000).contains(&value) {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 0 to 999")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !(0.0..1000.0).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        let hundredths = (value * 100.0).round();

        if (hundredths / 100.0 - value).abs() > f32::EPSILON * value.max(1.0) {
            return Err(WeightError::InvalidResolution);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().replace(',', ".").parse::<f32>() {
            Ok(parsed_value) if parsed_value.is_finite() => Weight::new(parsed_value),
            _ => Err(WeightError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0.0 to 999.99 kg")]
    OutOfRange,
    #[error("Weight must be a multiple of 0.01 kg")]
    InvalidResolution,
    #[error("Weight must be a decimal")]
    ParseError,
}

/// One-based position of a set within an exercise.
#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SetNumber(u32);

impl SetNumber {
    pub const FIRST: SetNumber = SetNumber(1);

    pub fn new(value: u32) -> Result<Self, SetNumberError> {
        if value == 0 {
            return Err(SetNumberError::Zero);
        }

        Ok(Self(value))
    }

    /// Set number of the element at the given zero-based index.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).map_or(u32::MAX, |i| i.saturating_add(1)))
    }

    #[must_use]
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SetNumberError {
    #[error("Set number must be 1 or greater")]
    Zero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetField {
    Weight,
    Reps,
}

/// Raw text of a set as entered in a form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SetInput {
    pub weight: String,
    pub reps: String,
}

impl SetInput {
    #[must_use]
    pub fn new(weight: Option<Weight>, reps: Option<Reps>) -> Self {
        Self {
            weight: weight.map(|w| w.to_string()).unwrap_or_default(),
            reps: reps.map(|r| r.to_string()).unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.weight.trim().is_empty() && self.reps.trim().is_empty()
    }

    pub fn set(&mut self, field: SetField, value: &str) {
        match field {
            SetField::Weight => value.clone_into(&mut self.weight),
            SetField::Reps => value.clone_into(&mut self.reps),
        }
    }

    /// Blank fields become `None`; non-blank fields must parse.
    pub fn parse(&self) -> Result<(Option<Weight>, Option<Reps>), SetInputError> {
        let weight = if self.weight.trim().is_empty() {
            None
        } else {
            Some(Weight::try_from(self.weight.as_str())?)
        };
        let reps = if self.reps.trim().is_empty() {
            None
        } else {
            Some(Reps::try_from(self.reps.as_str())?)
        };
        Ok((weight, reps))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SetInputError {
    #[error(transparent)]
    Weight(#[from] WeightError),
    #[error(transparent)]
    Reps(#[from] RepsError),
}

/// Pairs each set input with its set number.
pub fn numbered(sets: &[SetInput]) -> impl Iterator<Item = (SetNumber, &SetInput)> {
    sets.iter()
        .enumerate()
        .map(|(index, set)| (SetNumber::from_index(index), set))
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("12", Ok(Reps(12)))]
    #[case(" 8 ", Ok(Reps(8)))]
    #[case("0", Ok(Reps(0)))]
    #[case("1000", Err(RepsError::OutOfRange))]
    #[case("7.5", Err(RepsError::ParseError))]
    #[case("-1", Err(RepsError::ParseError))]
    #[case("abc", Err(RepsError::ParseError))]
    fn test_reps_try_from_str(#[case] value: &str, #[case] expected: Result<Reps, RepsError>) {
        assert_eq!(Reps::try_from(value), expected);
    }

    #[rstest]
    #[case("80", Ok(Weight(80.0)))]
    #[case("22.5", Ok(Weight(22.5)))]
    #[case("12,25", Ok(Weight(12.25)))]
    #[case("0", Ok(Weight(0.0)))]
    #[case("1000", Err(WeightError::OutOfRange))]
    #[case("-2.5", Err(WeightError::OutOfRange))]
    #[case("256.02", Ok(Weight(256.02)))]
    #[case("327.45", Ok(Weight(327.45)))]
    #[case("999.99", Ok(Weight(999.99)))]
    #[case("10.125", Err(WeightError::InvalidResolution))]
    #[case("256.025", Err(WeightError::InvalidResolution))]
    #[case("heavy", Err(WeightError::ParseError))]
    #[case("inf", Err(WeightError::ParseError))]
    fn test_weight_try_from_str(
        #[case] value: &str,
        #[case] expected: Result<Weight, WeightError>,
    ) {
        assert_eq!(Weight::try_from(value), expected);
    }

    #[test]
    fn test_weight_accepts_every_hundredth() {
        let rejected = (0..100_000)
            .map(|hundredths| format!("{}.{:02}", hundredths / 100, hundredths % 100))
            .filter(|value| Weight::try_from(value.as_str()).is_err())
            .collect::<Vec<_>>();

        assert_eq!(rejected, Vec::<String>::new());
    }

    #[test]
    fn test_weight_into_f32() {
        assert_approx_eq!(f32::from(Weight::new(62.5).unwrap()), 62.5);
    }

    #[rstest]
    #[case(0, Err(SetNumberError::Zero))]
    #[case(1, Ok(SetNumber::FIRST))]
    #[case(7, Ok(SetNumber(7)))]
    fn test_set_number_new(
        #[case] value: u32,
        #[case] expected: Result<SetNumber, SetNumberError>,
    ) {
        assert_eq!(SetNumber::new(value), expected);
    }

    #[test]
    fn test_set_number_index() {
        assert_eq!(SetNumber::from_index(0), SetNumber::FIRST);
        assert_eq!(SetNumber::from_index(4).index(), 4);
    }

    #[rstest]
    #[case(SetInput::default(), true)]
    #[case(SetInput { weight: " ".into(), reps: String::new() }, true)]
    #[case(SetInput { weight: "60".into(), reps: String::new() }, false)]
    #[case(SetInput { weight: String::new(), reps: "10".into() }, false)]
    fn test_set_input_is_blank(#[case] input: SetInput, #[case] expected: bool) {
        assert_eq!(input.is_blank(), expected);
    }

    #[test]
    fn test_set_input_new() {
        assert_eq!(
            SetInput::new(Some(Weight::new(22.5).unwrap()), Some(Reps::new(8).unwrap())),
            SetInput {
                weight: "22.5".into(),
                reps: "8".into()
            }
        );
        assert_eq!(SetInput::new(None, None), SetInput::default());
    }

    #[test]
    fn test_set_input_set() {
        let mut input = SetInput::default();
        input.set(SetField::Weight, "40");
        input.set(SetField::Reps, "6");
        assert_eq!(
            input,
            SetInput {
                weight: "40".into(),
                reps: "6".into()
            }
        );
    }

    #[rstest]
    #[case(SetInput::default(), Ok((None, None)))]
    #[case(
        SetInput { weight: "40".into(), reps: String::new() },
        Ok((Some(Weight(40.0)), None))
    )]
    #[case(
        SetInput { weight: String::new(), reps: "12".into() },
        Ok((None, Some(Reps(12))))
    )]
    #[case(
        SetInput { weight: "x".into(), reps: "12".into() },
        Err(SetInputError::Weight(WeightError::ParseError))
    )]
    #[case(
        SetInput { weight: "40".into(), reps: "1000".into() },
        Err(SetInputError::Reps(RepsError::OutOfRange))
    )]
    fn test_set_input_parse(
        #[case] input: SetInput,
        #[case] expected: Result<(Option<Weight>, Option<Reps>), SetInputError>,
    ) {
        assert_eq!(input.parse(), expected);
    }

    #[test]
    fn test_numbered() {
        let sets = vec![SetInput::default(), SetInput::default()];
        assert_eq!(
            numbered(&sets).map(|(n, _)| n).collect::<Vec<_>>(),
            vec![SetNumber(1), SetNumber(2)]
        );
    }
}
