//! School input types - creation draft and partial update
//!
//! Raw request bodies deserialize into `NewSchool` / `SchoolPatch`.
//! Both are folded into validated, fixed-field structures before they
//! reach a store.

use serde::{Deserialize, Deserializer};

use super::ValidationError;

/// Creation request as received (JSON body or multipart text fields)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSchool {
    pub school_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

impl NewSchool {
    /// Set a field by its form name. Unknown names are ignored.
    pub fn set_field(&mut self, name: &str, value: String) {
        let slot = match name {
            "school_name" => &mut self.school_name,
            "address" => &mut self.address,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "contact" => &mut self.contact,
            "email" => &mut self.email,
            "image" => &mut self.image,
            _ => return,
        };
        *slot = Some(value);
    }

    /// Validate required fields and normalise optionals.
    ///
    /// Empty `contact`, `email` and `image` are stored as NULL.
    pub fn into_draft(self) -> Result<SchoolDraft, ValidationError> {
        Ok(SchoolDraft {
            school_name: required(self.school_name)?,
            address: required(self.address)?,
            city: required(self.city)?,
            state: required(self.state)?,
            contact: non_empty(self.contact),
            email: non_empty(self.email),
            image: non_empty(self.image),
        })
    }
}

fn required(value: Option<String>) -> Result<String, ValidationError> {
    non_empty(value).ok_or(ValidationError::MissingRequired)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Validated school ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolDraft {
    pub school_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

impl SchoolDraft {
    /// Uploaded file wins over any `image` text field.
    pub fn with_uploaded_image(mut self, filename: Option<String>) -> Self {
        if filename.is_some() {
            self.image = filename;
        }
        self
    }
}

/// Tri-state field for partial updates
///
/// - `Absent`: field not in the request, left unchanged
/// - `Null`: explicit `null`, column set to NULL
/// - `Value`: explicit value, including the empty string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Column value for a present patch; `None` means NULL.
    pub fn as_column(&self) -> Option<Option<&T>> {
        match self {
            Self::Absent => None,
            Self::Null => Some(None),
            Self::Value(v) => Some(Some(v)),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Missing keys never reach here: `#[serde(default)]` yields Absent.
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Self::Value(v),
            None => Self::Null,
        })
    }
}

/// Partial update request as received
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchoolPatch {
    pub school_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(default)]
    pub contact: Patch<String>,
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub image: Patch<String>,
}

impl SchoolPatch {
    /// Fold into the fixed-field change set.
    ///
    /// Required columns only change when given a non-empty value; the
    /// optional columns change whenever the key is present.
    pub fn into_changes(self) -> Result<SchoolChanges, ValidationError> {
        let changes = SchoolChanges {
            school_name: non_empty(self.school_name),
            address: non_empty(self.address),
            city: non_empty(self.city),
            state: non_empty(self.state),
            contact: self.contact,
            email: self.email,
            image: self.image,
        };

        if changes.is_empty() {
            return Err(ValidationError::NoChanges);
        }
        Ok(changes)
    }
}

/// Validated, non-empty set of column changes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchoolChanges {
    pub school_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub contact: Patch<String>,
    pub email: Patch<String>,
    pub image: Patch<String>,
}

impl SchoolChanges {
    pub fn is_empty(&self) -> bool {
        self.school_name.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.contact.is_absent()
            && self.email.is_absent()
            && self.image.is_absent()
    }
}
