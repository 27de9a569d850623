//! 16.16 fixed-point sine and cosine
//!
//! 2048 steps per full turn; entry `i` is `floor(65536 * sin(i * PI / 1024))`.

use std::f64::consts::PI;
use std::sync::OnceLock;

pub const TABLE_SIZE: usize = 2048;

pub struct TrigTables {
    pub sine: [i32; TABLE_SIZE],
    pub cosine: [i32; TABLE_SIZE],
}

static TABLES: OnceLock<TrigTables> = OnceLock::new();

/// Shared tables, built on first use
pub fn tables() -> &'static TrigTables {
    TABLES.get_or_init(|| {
        let mut sine = [0i32; TABLE_SIZE];
        let mut cosine = [0i32; TABLE_SIZE];
        for (i, (s, c)) in sine.iter_mut().zip(cosine.iter_mut()).enumerate() {
            let angle = i as f64 * PI / 1024.0;
            *s = (65536.0 * angle.sin()).floor() as i32;
            *c = (65536.0 * angle.cos()).floor() as i32;
        }
        TrigTables { sine, cosine }
    })
}
