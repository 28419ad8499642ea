//! Response-model validation.
//!
//! [`response_model`] registers an after-hook that decodes the response
//! body as JSON, hands it to a [`ModelValidator`] and stores the validated
//! model in the response extensions. Handlers and [`decode`] then read the
//! model back instead of parsing the body again.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use crate::{Error, RequestDescriptor, Response, Result, from_json_value};

/// Validates a decoded JSON payload into a model.
///
/// Closures `Fn(Value) -> Result<M>` are validators too.
pub trait ModelValidator: Send + Sync + 'static {
    /// The validated model.
    type Model: Clone + Send + Sync + 'static;

    /// Validate a payload.
    ///
    /// # Errors
    ///
    /// Returns an error when the payload does not describe a valid model.
    fn validate(&self, data: Value) -> Result<Self::Model>;
}

impl<F, M> ModelValidator for F
where
    F: Fn(Value) -> Result<M> + Send + Sync + 'static,
    M: Clone + Send + Sync + 'static,
{
    type Model = M;

    fn validate(&self, data: Value) -> Result<M> {
        self(data)
    }
}

/// A validator backed by `serde`: the model is valid when it deserializes.
pub struct JsonModel<M>(PhantomData<fn() -> M>);

impl<M> JsonModel<M> {
    /// Creates the validator.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<M> Default for JsonModel<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> std::fmt::Debug for JsonModel<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("JsonModel")
            .field(&std::any::type_name::<M>())
            .finish()
    }
}

impl<M> ModelValidator for JsonModel<M>
where
    M: DeserializeOwned + Clone + Send + Sync + 'static,
{
    type Model = M;

    fn validate(&self, data: Value) -> Result<M> {
        from_json_value(data).map_err(|err| Error::validation(err.to_string()))
    }
}

/// Register a model-validating after-hook on an endpoint.
///
/// The hook is added to the multi-hook chain at `index` (default 0).
///
/// ```ignore
/// let mut endpoint = RequestDescriptor::get("/metro/station").build()?;
/// response_model(&mut endpoint, JsonModel::<Station>::new(), None);
/// ```
pub fn response_model<V: ModelValidator>(
    descriptor: &mut RequestDescriptor,
    validator: V,
    index: Option<i32>,
) {
    let validator = Arc::new(validator);
    descriptor.add_after_hook(
        move |mut response: Response| {
            let validator = Arc::clone(&validator);
            async move {
                let data: Value = response.json()?;
                let model = validator.validate(data)?;
                trace!(model = std::any::type_name::<V::Model>(), "response model stored");
                response.extensions_mut().insert(model);
                Ok::<_, Error>(response)
            }
        },
        index,
    );
}

/// The model stored by a [`response_model`] hook, if any.
#[must_use]
pub fn model<M: Clone + Send + Sync + 'static>(response: &Response) -> Option<&M> {
    response.extensions().get::<M>()
}

/// Turn a response into a typed value.
///
/// A model stored by [`response_model`] is returned as is; otherwise the
/// status must be 2xx and the body is deserialized as JSON.
///
/// # Errors
///
/// Returns an HTTP error for non-2xx responses, or a deserialization error.
pub fn decode<M>(mut response: Response) -> Result<M>
where
    M: DeserializeOwned + Clone + Send + Sync + 'static,
{
    if let Some(model) = response.extensions_mut().remove::<M>() {
        return Ok(model);
    }
    response.error_for_status()?.json()
}
