use chrono::{DateTime, Local, Utc};
use std::fmt::Write;

use wizard_core::{ConditionCategory, Phase, UiView, WeatherSnapshot};

/// Text for whatever the view currently holds.
pub fn view(view: &UiView<'_>) -> String {
    match view.phase {
        Phase::Idle => String::new(),
        Phase::Loading => "Loading...\n".to_string(),
        Phase::Error(message) => format!("✗ {message}\n"),
        Phase::Success(snapshot) => snapshot_card(snapshot),
    }
}

pub fn snapshot_card(snap: &WeatherSnapshot) -> String {
    let category = ConditionCategory::of(snap);
    let mut out = String::new();

    let place = match &snap.country {
        Some(country) => format!("{}, {}", snap.location_name, country),
        None => snap.location_name.clone(),
    };
    let _ = writeln!(out, "── {place} [{}] ──", category.variant());
    out.push_str(&summary(snap, category));
    out.push('\n');

    for (label, value) in tiles(snap) {
        let _ = writeln!(out, "  {label:<15} {value}");
    }
    out
}

fn summary(snap: &WeatherSnapshot, category: ConditionCategory) -> String {
    let description = snap
        .condition
        .as_ref()
        .map(|c| c.description.as_str())
        .filter(|d| !d.is_empty())
        .unwrap_or("Mystery clouds...");

    format!(
        "The air whispers, 'It feels like {}°C...'\n\
         The temperature dances between {}°C and {}°C.\n\
         Conditions: {}\n\
         {}\n",
        snap.feels_like_c,
        snap.temp_min_c,
        snap.temp_max_c,
        description,
        category.advice(),
    )
}

fn tiles(snap: &WeatherSnapshot) -> Vec<(&'static str, String)> {
    vec![
        ("Temperature", format!("{}°C", snap.temperature_c)),
        ("Wind Speed", format!("{} m/s", snap.wind_speed_mps)),
        ("Wind Direction", format!("{}°", snap.wind_direction_deg)),
        ("Humidity", format!("{}%", snap.humidity_pct)),
        ("Feels Like", format!("{}°C", snap.feels_like_c)),
        ("Pressure", format!("{} hPa", snap.pressure_hpa)),
        (
            "Visibility",
            snap.visibility_km().map_or_else(|| "n/a".to_string(), |km| format!("{km} km")),
        ),
        ("Cloudiness", format!("{}%", snap.cloudiness_pct)),
        ("Sunrise", local_time(snap.sunrise)),
        ("Sunset", local_time(snap.sunset)),
    ]
}

fn local_time(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(
        || "n/a".to_string(),
        |t| t.with_timezone(&Local).format("%H:%M:%S").to_string(),
    )
}
