//! Admin form validation
//!
//! Field errors are collected into a `FormErrors` map keyed by form field
//! name, the same names the multipart form uses.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::models::{BookForm, UploadedFile};

/// Largest accepted image, in bytes (2 MiB)
pub const MAX_IMAGE_BYTES: usize = 2_097_152;

pub const ALLOWED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

pub const NAME_MAX_CHARS: usize = 45;
pub const DESCRIPTION_MAX_CHARS: usize = 700;

/// Decimal places kept on prices and discounts
pub const MONEY_SCALE: u32 = 4;

// Prices live in REAL columns and come back through f64. 14 significant
// digits is what survives that round trip unchanged.
const MONEY_MAX_MANTISSA: i64 = 99_999_999_999_999;

/// Largest accepted price or discount, in either direction
pub fn money_limit() -> Decimal {
    Decimal::new(MONEY_MAX_MANTISSA, MONEY_SCALE)
}

/// Messages per form field
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`, empty if none
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Scalar form values that passed the type and length checks
#[derive(Debug, Clone, PartialEq)]
pub struct BookInput {
    pub name: String,
    pub description: Option<String>,
    pub genre_id: Option<i32>,
    pub author_id: Option<i32>,
    pub sale_price: Decimal,
    pub cost_price: Decimal,
    pub discount_percent: Decimal,
    pub stock_status: bool,
    pub is_best_seller: bool,
    pub is_new: bool,
    pub tag_ids: Vec<i32>,
}

/// Required, length and type checks on the scalar fields.
///
/// Every failing field is reported, not just the first one.
pub fn validate_fields(form: &BookForm) -> Result<BookInput, FormErrors> {
    let mut errors = FormErrors::default();

    let name = form.name.clone().unwrap_or_default();
    if name.trim().is_empty() {
        errors.add("name", "The name field is required.");
    } else if name.chars().count() > NAME_MAX_CHARS {
        errors.add(
            "name",
            format!("name must be at most {} characters", NAME_MAX_CHARS),
        );
    }

    let description = form.desc.clone().filter(|d| !d.is_empty());
    if let Some(d) = &description
        && d.chars().count() > DESCRIPTION_MAX_CHARS
    {
        errors.add(
            "desc",
            format!(
                "desc must be at most {} characters",
                DESCRIPTION_MAX_CHARS
            ),
        );
    }

    let genre_id = parse_id(&form.genre_id, "genre_id", &mut errors);
    let author_id = parse_id(&form.author_id, "author_id", &mut errors);
    let sale_price = parse_decimal(&form.sale_price, "sale_price", &mut errors);
    let cost_price = parse_decimal(&form.cost_price, "cost_price", &mut errors);
    let discount_percent = parse_decimal(&form.discount_percent, "discount_percent", &mut errors);
    let stock_status = parse_flag(&form.stock_status, "stock_status", &mut errors);
    let is_best_seller = parse_flag(&form.is_best_seller, "is_best_seller", &mut errors);
    let is_new = parse_flag(&form.is_new, "is_new", &mut errors);

    let mut tag_ids = Vec::with_capacity(form.tag_ids.len());
    for raw in &form.tag_ids {
        match raw.trim().parse::<i32>() {
            Ok(id) => tag_ids.push(id),
            Err(_) => errors.add(
                "tag_ids",
                format!("The value '{}' is not valid for tag_ids.", raw),
            ),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(BookInput {
        name,
        description,
        genre_id,
        author_id,
        sale_price,
        cost_price,
        discount_percent,
        stock_status,
        is_best_seller,
        is_new,
        tag_ids,
    })
}

/// Check one uploaded image, recording the first problem under `field`.
///
/// The content type is checked before the size.
pub fn is_image_valid(file: &UploadedFile, field: &str, errors: &mut FormErrors) -> bool {
    if !is_image_file(file) {
        errors.add(field, format!("{} must be image/png or image/jpeg", field));
        return false;
    }

    if file.size > MAX_IMAGE_BYTES {
        errors.add(field, format!("{} must be less or equal than 2MB", field));
        return false;
    }

    true
}

/// Collect every problem with the form's files at once.
///
/// Unlike the create flow, nothing stops at the first failure: missing
/// posters, wrong types and oversized files are all reported.
pub fn validate_book_files(form: &BookForm, errors: &mut FormErrors) {
    let posters = [
        ("poster_file", form.poster_file.as_ref()),
        ("hover_poster_file", form.hover_poster_file.as_ref()),
    ];

    for (field, file) in posters {
        match file {
            None => errors.add(field, format!("{} is required", field)),
            Some(file) => check_all(file, field, errors),
        }
    }

    for file in &form.image_files {
        check_all(file, "image_files", errors);
    }
}

fn check_all(file: &UploadedFile, field: &str, errors: &mut FormErrors) {
    if !is_image_file(file) {
        errors.add(field, format!("{} must be image/png or image/jpeg", field));
    }
    if file.size > MAX_IMAGE_BYTES {
        errors.add(field, format!("{} must be less or equal than 2MB", field));
    }
}

fn is_image_file(file: &UploadedFile) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&file.content_type.as_str())
}

fn blank(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_id(raw: &Option<String>, field: &str, errors: &mut FormErrors) -> Option<i32> {
    let value = blank(raw)?;
    match value.parse::<i32>() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, format!("The value '{}' is not valid for {}.", value, field));
            None
        }
    }
}

fn parse_decimal(raw: &Option<String>, field: &str, errors: &mut FormErrors) -> Decimal {
    let Some(value) = blank(raw) else {
        return Decimal::ZERO;
    };
    let amount = match Decimal::from_str(value) {
        Ok(d) => d.normalize(),
        Err(_) => {
            errors.add(field, format!("The value '{}' is not valid for {}.", value, field));
            return Decimal::ZERO;
        }
    };

    if amount.scale() > MONEY_SCALE {
        errors.add(
            field,
            format!("{} must have at most {} decimal places", field, MONEY_SCALE),
        );
        return Decimal::ZERO;
    }

    let limit = money_limit();
    if amount.abs() > limit {
        errors.add(
            field,
            format!("{} must be between -{} and {}", field, limit, limit),
        );
        return Decimal::ZERO;
    }

    amount
}

// Checkboxes arrive as "true"/"on" when ticked and are absent otherwise
fn parse_flag(raw: &Option<String>, field: &str, errors: &mut FormErrors) -> bool {
    let Some(value) = blank(raw) else {
        return false;
    };
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => true,
        "false" | "off" | "0" => false,
        _ => {
            errors.add(field, format!("The value '{}' is not valid for {}.", value, field));
            false
        }
    }
}
