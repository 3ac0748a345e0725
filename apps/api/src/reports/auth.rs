/// Fixed operator username/password pair, checked by exact string match.
/// No hashing, expiry or lockout.
#[derive(Debug, Clone)]
pub struct OperatorGate {
    username: String,
    password: String,
}

impl OperatorGate {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}
