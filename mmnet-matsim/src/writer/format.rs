use uom::si::{
    f64::{Length, Velocity},
    length::{kilometer, meter},
    velocity::{kilometer_per_hour, meter_per_second},
};

/// fixed precision decimal without trailing zeros, "-0" written as "0".
pub fn format_decimal(value: f64, decimals: usize) -> String {
    let mut text = format!("{value:.decimals$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = String::from("0");
    }
    text
}

/// rounds to the given number of decimals
pub fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// `HH:MM:SS`, hours are not wrapped at midnight
pub fn format_time(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

pub fn kmh_to_meters_per_second(speed_kmh: f64) -> f64 {
    Velocity::new::<kilometer_per_hour>(speed_kmh).get::<meter_per_second>()
}

pub fn meters_to_km(length_m: f64) -> f64 {
    Length::new::<meter>(length_m).get::<kilometer>()
}
