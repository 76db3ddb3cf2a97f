const UNITS: [&str; 5] = ["KB", "MB", "GB", "TB", "PB"];

/// Binary-scaled size for summaries: `512 B`, `1.50 KB`, `3.00 MB`.
pub fn human_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut n = bytes as f64 / 1024.0;
    let mut unit = 0;
    while n >= 1024.0 && unit < UNITS.len() - 1 {
        n /= 1024.0;
        unit += 1;
    }
    format!("{n:.2} {}", UNITS[unit])
}
