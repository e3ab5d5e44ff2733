use serde::{Deserialize, Serialize};

use crate::validation::{Constraint, FieldRules, Validate};

/// A stored cat. `id` is supplied by the caller and is not required to be unique.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cat {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub breed: String,
}

/// Body of `POST /cats`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCatDto {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub breed: String,
}

impl From<CreateCatDto> for Cat {
    fn from(dto: CreateCatDto) -> Self {
        Self { id: dto.id, name: dto.name, age: dto.age, breed: dto.breed }
    }
}

/// Partial update; only present fields are merged over the stored record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
}

/// Body of `PUT /cats/:id`.
pub type UpdateCatDto = CatPatch;

impl CatPatch {
    pub fn apply(&self, cat: &mut Cat) {
        if let Some(name) = &self.name {
            cat.name = name.clone();
        }
        if let Some(age) = self.age {
            cat.age = age;
        }
        if let Some(breed) = &self.breed {
            cat.breed = breed.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.breed.is_none()
    }
}

/// Largest value an `i32` field accepts. Declared first so it is checked last.
const I32_MAX: Constraint = Constraint::Max(i32::MAX as i64);

const CREATE_CAT_RULES: &[FieldRules] = &[
    FieldRules::required("id", &[I32_MAX, Constraint::IsInt, Constraint::Min(1)]),
    FieldRules::required("name", &[Constraint::IsString, Constraint::Length { min: 3, max: 30 }]),
    FieldRules::required("age", &[Constraint::IsInt, Constraint::Min(0), Constraint::Max(25)]),
    FieldRules::required("breed", &[Constraint::IsString, Constraint::Length { min: 3, max: 30 }]),
];

const UPDATE_CAT_RULES: &[FieldRules] = &[
    FieldRules::optional("name", &[Constraint::IsString]),
    FieldRules::optional("age", &[I32_MAX, Constraint::IsInt, Constraint::IsPositive]),
    FieldRules::optional("breed", &[Constraint::IsString]),
];

impl Validate for CreateCatDto {
    fn rules() -> &'static [FieldRules] {
        CREATE_CAT_RULES
    }
}

impl Validate for CatPatch {
    fn rules() -> &'static [FieldRules] {
        UPDATE_CAT_RULES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::parse_validated;
    use crate::ModelError;
    use serde_json::json;

    fn tom() -> Cat {
        Cat { id: 1, name: "Tom".into(), age: 3, breed: "Siamese".into() }
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut cat = tom();
        CatPatch { age: Some(4), ..Default::default() }.apply(&mut cat);
        assert_eq!(cat, Cat { age: 4, ..tom() });
        assert!(CatPatch::default().is_empty());
    }

    #[test]
    fn create_dto_accepts_valid_cat() -> anyhow::Result<()> {
        let dto: CreateCatDto =
            parse_validated(json!({"id": 1, "name": "Tom", "age": 3, "breed": "Siamese"}))?;
        assert_eq!(Cat::from(dto), tom());
        Ok(())
    }

    #[test]
    fn create_dto_rejects_missing_fields_with_last_declared_rule() {
        let err = parse_validated::<CreateCatDto>(json!({"id": 1, "name": "Tom", "breed": "Siamese"}));
        assert_eq!(
            err,
            Err(ModelError::Validation("Validation failed: age must not be greater than 25".into()))
        );

        let err = parse_validated::<CreateCatDto>(json!({"id": 1, "age": 3, "breed": "Persian"}));
        assert_eq!(
            err,
            Err(ModelError::Validation(
                "Validation failed: name must be longer than or equal to 3 characters".into()
            ))
        );

        let err = parse_validated::<CreateCatDto>(json!({"name": "Tom", "age": 3, "breed": "Persian"}));
        assert_eq!(
            err,
            Err(ModelError::Validation("Validation failed: id must not be less than 1".into()))
        );
    }

    #[test]
    fn out_of_range_ids_fail_validation_not_deserialization() {
        let err = parse_validated::<CreateCatDto>(
            json!({"id": 3_000_000_000u64, "name": "Tom", "age": 3, "breed": "Persian"}),
        );
        assert_eq!(
            err,
            Err(ModelError::Validation(
                "Validation failed: id must not be greater than 2147483647".into()
            ))
        );

        let err = parse_validated::<UpdateCatDto>(json!({"age": 3_000_000_000u64}));
        assert_eq!(
            err,
            Err(ModelError::Validation(
                "Validation failed: age must not be greater than 2147483647".into()
            ))
        );
    }

    #[test]
    fn create_dto_rejects_short_name() {
        let err = parse_validated::<CreateCatDto>(json!({"id": 1, "name": "To", "age": 3, "breed": "Siamese"}));
        assert_eq!(
            err,
            Err(ModelError::Validation(
                "Validation failed: name must be longer than or equal to 3 characters".into()
            ))
        );
    }

    #[test]
    fn create_dto_checks_bounds() {
        let err = parse_validated::<CreateCatDto>(json!({"id": 0, "name": "Tom", "age": 26, "breed": "Siamese"}));
        assert_eq!(
            err,
            Err(ModelError::Validation(
                "Validation failed: id must not be less than 1, age must not be greater than 25".into()
            ))
        );
    }

    #[test]
    fn update_dto_allows_partial_and_requires_positive_age() -> anyhow::Result<()> {
        let patch: UpdateCatDto = parse_validated(json!({"age": 4}))?;
        assert_eq!(patch, CatPatch { age: Some(4), ..Default::default() });

        let err = parse_validated::<UpdateCatDto>(json!({"age": 0}));
        assert_eq!(
            err,
            Err(ModelError::Validation("Validation failed: age must be a positive number".into()))
        );

        let err = parse_validated::<UpdateCatDto>(json!({"age": -1.5}));
        assert_eq!(
            err,
            Err(ModelError::Validation("Validation failed: age must be a positive number".into()))
        );

        let err = parse_validated::<UpdateCatDto>(json!({"age": 1.5}));
        assert_eq!(
            err,
            Err(ModelError::Validation("Validation failed: age must be an integer number".into()))
        );
        Ok(())
    }
}
