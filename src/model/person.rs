use crate::model::PersonId;
use serde::{Deserialize, Serialize};

/// A person's share weight for weighted splits. Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Weight(f64);

impl Weight {
    pub const ONE: Weight = Weight(1.0);

    /// Creates a weight, replacing non-finite and non-positive values with 1.
    pub fn new(value: f64) -> Self {
        Self(Self::normalize(value))
    }

    /// Maps non-finite and non-positive values to 1 and passes everything else through.
    pub fn normalize(value: f64) -> f64 {
        if value.is_finite() && value > 0.0 {
            value
        } else {
            1.0
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<f64> for Weight {
    fn from(value: f64) -> Self {
        Weight::new(value)
    }
}

impl From<Weight> for f64 {
    fn from(weight: Weight) -> Self {
        weight.0
    }
}

/// Someone who takes part in a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Person {
    id: PersonId,
    name: String,
    #[serde(default)]
    weight: Weight,
}

impl Person {
    pub fn new(id: impl Into<PersonId>, name: impl Into<String>, weight: impl Into<Weight>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            weight: weight.into(),
        }
    }

    pub fn id(&self) -> &PersonId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn set_weight(&mut self, weight: impl Into<Weight>) {
        self.weight = weight.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_normalizes() {
        assert_eq!(Weight::new(2.5).value(), 2.5);
        assert_eq!(Weight::new(0.0).value(), 1.0);
        assert_eq!(Weight::new(-3.0).value(), 1.0);
        assert_eq!(Weight::new(f64::NAN).value(), 1.0);
        assert_eq!(Weight::new(f64::INFINITY).value(), 1.0);
    }

    #[test]
    fn test_deserialize_normalizes_weight() {
        let person: Person = serde_json::from_str(r#"{"id":"p1","name":"Ana","weight":-2}"#).unwrap();
        assert_eq!(person.weight(), Weight::ONE);
    }

    #[test]
    fn test_deserialize_default_weight() {
        let person: Person = serde_json::from_str(r#"{"id":"p1","name":"Ana"}"#).unwrap();
        assert_eq!(person.weight(), Weight::ONE);
    }

    #[test]
    fn test_serialize_weight_as_number() {
        let person = Person::new("p1", "Ana", 1.5);
        let json = serde_json::to_string(&person).unwrap();
        assert_eq!(json, r#"{"id":"p1","name":"Ana","weight":1.5}"#);
    }
}
