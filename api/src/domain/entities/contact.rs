//! Contact message entity

use serde::Deserialize;

/// A message sent through the contact page
#[derive(Debug, Clone, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}
