use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

use super::{
    dto::{CreateMealRequest, DateInput, UpdateMealRequest},
    repo_types::{MealChanges, NewMeal},
};
use crate::error::{AppError, AppResult};

/// Parse a meal timestamp. Accepts RFC 3339, or a naive date/time which is
/// taken as UTC. The result is always normalized to UTC.
pub(crate) fn parse_meal_date(raw: &str) -> AppResult<OffsetDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(dt.to_offset(UtcOffset::UTC));
    }

    let naive = [
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
    ];
    for fmt in naive {
        if let Ok(dt) = PrimitiveDateTime::parse(raw, fmt) {
            return Ok(dt.assume_utc());
        }
    }

    if let Ok(day) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Ok(day.midnight().assume_utc());
    }

    Err(AppError::validation(format!("date is not a valid point in time: {raw:?}")))
}

/// Resolve a client-supplied meal time, string or epoch milliseconds.
pub(crate) fn resolve_meal_date(input: &DateInput) -> AppResult<OffsetDateTime> {
    match input {
        DateInput::Text(raw) => parse_meal_date(raw),
        DateInput::EpochMillis(ms) => {
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(*ms) * 1_000_000)
                .map_err(|_| AppError::validation(format!("date is out of range: {ms}")))
        }
    }
}

fn non_empty(field: &str, value: String) -> AppResult<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    Ok(value)
}

pub(crate) fn validate_new_meal(body: CreateMealRequest) -> AppResult<NewMeal> {
    let name = body
        .name
        .ok_or_else(|| AppError::validation("name is required"))
        .and_then(|v| non_empty("name", v))?;
    let description = body
        .description
        .ok_or_else(|| AppError::validation("description is required"))
        .and_then(|v| non_empty("description", v))?;
    let occurred_at = match body.date {
        Some(input) => resolve_meal_date(&input)?,
        None => OffsetDateTime::now_utc(),
    };
    Ok(NewMeal {
        name,
        description,
        occurred_at,
        is_on_diet: body.is_on_diet.unwrap_or(true),
    })
}

pub(crate) fn validate_changes(body: UpdateMealRequest) -> AppResult<MealChanges> {
    Ok(MealChanges {
        name: body.name.map(|v| non_empty("name", v)).transpose()?,
        description: body
            .description
            .map(|v| non_empty("description", v))
            .transpose()?,
        occurred_at: body.date.as_ref().map(resolve_meal_date).transpose()?,
        is_on_diet: body.is_on_diet,
    })
}
