//! Field checks shared by the forms. Each check records at most one message
//! per field; the first failing check wins.

use jiff::civil::Date;

use crate::error::FieldErrors;

pub fn required(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "is required");
    }
}

pub fn required_opt<T>(errors: &mut FieldErrors, field: &str, value: Option<&T>) {
    if value.is_none() {
        errors.add(field, "is required");
    }
}

pub fn max_len(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.trim().chars().count() > max {
        errors.add(field, format!("must be at most {max} characters"));
    }
}

pub fn min_len(errors: &mut FieldErrors, field: &str, value: &str, min: usize) {
    if value.chars().count() < min {
        errors.add(field, format!("must be at least {min} characters"));
    }
}

pub fn not_in_future(errors: &mut FieldErrors, field: &str, value: Option<Date>, today: Date) {
    if value.is_some_and(|date| date > today) {
        errors.add(field, "cannot be in the future");
    }
}

pub fn in_range(errors: &mut FieldErrors, field: &str, value: Option<f64>, min: f64, max: f64) {
    if let Some(v) = value
        && !(v.is_finite() && (min..=max).contains(&v))
    {
        errors.add(field, format!("must be between {min} and {max}"));
    }
}

pub fn in_range_u32(errors: &mut FieldErrors, field: &str, value: Option<u32>, min: u32, max: u32) {
    if let Some(v) = value
        && !(min..=max).contains(&v)
    {
        errors.add(field, format!("must be between {min} and {max}"));
    }
}
