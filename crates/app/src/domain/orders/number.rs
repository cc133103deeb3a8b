//! Human readable order numbers.

use jiff::Timestamp;
use rand::Rng;

/// `ORD-<YYYYMMDD>-<8 upper-case hex chars>`, dated in UTC.
pub fn generate_order_number(now: Timestamp, rng: &mut impl Rng) -> String {
    let suffix: u32 = rng.r#gen();

    format!("ORD-{}-{suffix:08X}", now.strftime("%Y%m%d"))
}
