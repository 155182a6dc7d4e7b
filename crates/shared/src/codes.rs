//! Generation of one-time codes and team tokens.

use chrono::Utc;
use rand::Rng;

/// Generate a 6-digit numeric one-time code.
pub fn generate_otp_code() -> String {
    let mut rng = rand::thread_rng();
    format!("{:06}", rng.gen_range(100_000..1_000_000))
}

/// Generate a team token for an event, e.g. `HAC-7X29Q381` for "Hackathon".
///
/// The prefix is the first three characters of the event name, uppercased,
/// with spaces padded as `X`. The suffix combines five random alphanumerics
/// with the last three digits of the current timestamp. Collisions within an
/// event are astronomically rare and are not actively checked.
pub fn generate_team_token(event_name: &str) -> String {
    let prefix: String = event_name
        .chars()
        .map(|c| if c.is_whitespace() { 'X' } else { c.to_ascii_uppercase() })
        .chain(std::iter::repeat('X'))
        .take(3)
        .collect();

    let mut rng = rand::thread_rng();
    const CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let random_part: String = (0..5)
        .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
        .collect();

    let millis = Utc::now().timestamp_millis();
    format!("{}-{}{:03}", prefix, random_part, millis % 1000)
}
