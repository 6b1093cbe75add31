use uuid::Uuid;

pub struct ContactCreateRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub favorite: bool,
    pub owner: Option<Uuid>,
}

/// Fields to overwrite; `None` leaves the stored value as is.
#[derive(Debug, Default, Clone)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct ContactFilter {
    pub favorite: Option<bool>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ContactFilter {
    fn default() -> Self {
        Self {
            favorite: None,
            limit: 20,
            offset: 0,
        }
    }
}
