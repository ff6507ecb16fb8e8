//! The try-on call
//!
//! Uploads both images, runs the endpoint with the category and sampling
//! parameters, then downloads and decodes the first image of the gallery
//! it returns.

use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::gradio::{FileData, GradioClient};
use crate::preview::{self, Preview};
use crate::state::TryOnRequest;

/// Run one request end to end and return the result preview
pub async fn run(
    client: GradioClient,
    api_name: String,
    request: TryOnRequest,
    preview_size: u32,
) -> Result<Preview> {
    tracing::info!(
        category = %request.category,
        person = %request.person.display(),
        garment = %request.garment.display(),
        steps = request.params.n_steps,
        random_seed = request.params.is_random_seed(),
        "Sending try-on request"
    );

    let person = client.upload(&request.person).await?;
    let garment = client.upload(&request.garment).await?;

    let outputs = client
        .predict(&api_name, build_inputs(&person, &garment, &request)?)
        .await?;
    tracing::debug!(%outputs, "API response");

    let image = first_image(&outputs)?;
    let bytes = client.download(&image).await?;

    let result = preview::load_bytes(bytes, preview_size).await?;
    tracing::info!(width = result.width, height = result.height, "Try-on result ready");
    Ok(result)
}

/// Positional inputs: person, garment, category, then sampling parameters
pub fn build_inputs(
    person: &FileData,
    garment: &FileData,
    request: &TryOnRequest,
) -> Result<Vec<Value>> {
    let mut inputs = vec![
        serde_json::to_value(person)?,
        serde_json::to_value(garment)?,
        json!(request.category.as_str()),
    ];
    inputs.extend(request.params.to_inputs());
    Ok(inputs)
}

/// Pull the first generated image out of the endpoint's outputs.
///
/// The single output is a gallery: a list whose items are either
/// `{"image": <file>, "caption": ...}` objects or `[<file>, caption]` pairs.
/// A file is a FileData object or a bare path string.
pub fn first_image(outputs: &Value) -> Result<FileData> {
    let malformed = || Error::MalformedResponse(outputs.to_string());

    let gallery = match outputs.get(0) {
        Some(Value::Array(items)) => items,
        Some(_) => outputs.as_array().ok_or_else(malformed)?,
        None => return Err(malformed()),
    };

    let item = gallery.first().ok_or_else(malformed)?;
    let image = match item {
        Value::Object(fields) => fields.get("image"),
        Value::Array(pair) => pair.first(),
        _ => None,
    }
    .ok_or_else(malformed)?;

    let file = match image {
        Value::String(path) => FileData {
            path: Some(path.clone()),
            ..FileData::default()
        },
        Value::Object(_) => serde_json::from_value(image.clone()).map_err(|_| malformed())?,
        _ => return Err(malformed()),
    };

    if !file.is_locatable() {
        return Err(malformed());
    }
    Ok(file)
}
