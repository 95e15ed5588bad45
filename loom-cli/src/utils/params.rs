use crate::error::AppError;
use tracing::{debug, error};

/// Parses `key=value` strings into header pairs.
///
/// Each entry is split at its first '='; whitespace around the name is dropped.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` if an entry has no '=' or an empty name.
///
/// # Examples
///
/// ```
/// use loomfetch::utils::parse_params;
///
/// let params = vec![
///     "Cookie=a=b".to_string(),
///     "X-Token=1".to_string(),
/// ];
/// let result = parse_params(&params).unwrap();
/// assert_eq!(result, vec![
///     ("Cookie".to_string(), "a=b".to_string()),
///     ("X-Token".to_string(), "1".to_string()),
/// ]);
/// ```
pub fn parse_params(params: &[String]) -> Result<Vec<(String, String)>, AppError> {
    debug!("Parsing {} parameters", params.len());

    params
        .iter()
        .map(|param| {
            param
                .split_once('=')
                .map(|(key, value)| (key.trim().to_string(), value.to_string()))
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| {
                    error!("Invalid param format: {param}");
                    AppError::InvalidInput(format!("Invalid param format: {param}"))
                })
        })
        .collect()
}
