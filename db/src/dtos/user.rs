use common::misc::Subscription;

pub struct UserCreateRequest {
    pub email: String,
    pub password_hash: String,
    pub subscription: Subscription,
    pub avatar_url: String,
    pub verification_token: Option<String>,
}
