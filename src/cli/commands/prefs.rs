use serde_json::json;

use crate::cli::utils::{output_data, output_success};
use crate::cli::OutputFormat;
use crate::client::{FileStorage, LayoutState, Persisted, Theme, ThemeState};

pub fn theme(theme: Option<Theme>, output_format: OutputFormat) -> anyhow::Result<()> {
    let storage = FileStorage::from_env()?;
    let mut state = ThemeState::load(&storage);

    match theme {
        Some(theme) => {
            state.theme = theme;
            state.save(&storage)?;
            output_success(
                &output_format,
                &format!("Theme set to {}", theme),
                Some(json!({ "theme": theme })),
            )
        }
        None => output_data(&output_format, &json!({ "theme": state.theme }), |_| {
            println!("Theme: {}", state.theme);
        }),
    }
}

pub fn layout(header_height: Option<u32>, output_format: OutputFormat) -> anyhow::Result<()> {
    let storage = FileStorage::from_env()?;
    let mut state = LayoutState::load(&storage);

    match header_height {
        Some(height) => {
            state.header_height = height;
            state.save(&storage)?;
            output_success(
                &output_format,
                &format!("Header height set to {}px", height),
                Some(json!({ "header_height": height })),
            )
        }
        None => output_data(
            &output_format,
            &json!({ "header_height": state.header_height }),
            |_| println!("Header height: {}px", state.header_height),
        ),
    }
}
