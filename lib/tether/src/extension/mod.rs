//! Optional collaborators plugged into endpoints through hooks.

mod response_model;

pub use response_model::{JsonModel, ModelValidator, decode, model, response_model};
