// Credential handling

pub mod password;
