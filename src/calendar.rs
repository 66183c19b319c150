// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::{LedgerError, Result};
use crate::models::ReportScope;

/// Maps an anchor date to reporting-period boundaries and display keys.
/// Reports never hard-code month lengths; they go through this trait so
/// the same aggregation works for Jalali and Gregorian deployments.
pub trait Calendar {
    /// Inclusive first and last civil day of the period containing `anchor`.
    fn period_bounds(&self, scope: ReportScope, anchor: NaiveDate) -> Result<(NaiveDate, NaiveDate)>;

    /// Display key for the period containing `anchor`, e.g. `1403/05` or `2024-08`.
    fn period_key(&self, scope: ReportScope, anchor: NaiveDate) -> String;

    fn format_date(&self, date: NaiveDate) -> String;

    fn parse_date(&self, s: &str) -> Result<NaiveDate>;
}

/// Arithmetic Solar Hijri calendar, the deployment default. Conversion
/// follows the Khayyam 33-year cycle with the standard break-year table,
/// so leap years agree with the official Iranian calendar.
pub struct Jalali;

pub struct Gregorian;

impl Calendar for Jalali {
    fn period_bounds(&self, scope: ReportScope, anchor: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        let (jy, jm, _) = jalali::from_gregorian(anchor);
        match scope {
            ReportScope::Day => Ok((anchor, anchor)),
            ReportScope::Month => {
                let start = jalali::to_gregorian(jy, jm, 1)?;
                let end = jalali::to_gregorian(jy, jm, jalali::month_length(jy, jm))?;
                Ok((start, end))
            }
            ReportScope::Year => {
                let start = jalali::to_gregorian(jy, 1, 1)?;
                let end = jalali::to_gregorian(jy, 12, jalali::month_length(jy, 12))?;
                Ok((start, end))
            }
        }
    }

    fn period_key(&self, scope: ReportScope, anchor: NaiveDate) -> String {
        let (jy, jm, jd) = jalali::from_gregorian(anchor);
        match scope {
            ReportScope::Day => format!("{:04}/{:02}/{:02}", jy, jm, jd),
            ReportScope::Month => format!("{:04}/{:02}", jy, jm),
            ReportScope::Year => format!("{:04}", jy),
        }
    }

    fn format_date(&self, date: NaiveDate) -> String {
        let (jy, jm, jd) = jalali::from_gregorian(date);
        format!("{:04}/{:02}/{:02}", jy, jm, jd)
    }

    fn parse_date(&self, s: &str) -> Result<NaiveDate> {
        let invalid = || LedgerError::InvalidDate(s.to_string());
        let re = Regex::new(r"^(\d{4})/(\d{1,2})/(\d{1,2})$").map_err(|_| invalid())?;
        let caps = re.captures(s.trim()).ok_or_else(invalid)?;
        let jy: i32 = caps[1].parse().map_err(|_| invalid())?;
        let jm: u32 = caps[2].parse().map_err(|_| invalid())?;
        let jd: u32 = caps[3].parse().map_err(|_| invalid())?;
        jalali::to_gregorian(jy, jm, jd).map_err(|_| invalid())
    }
}

impl Calendar for Gregorian {
    fn period_bounds(&self, scope: ReportScope, anchor: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        match scope {
            ReportScope::Day => Ok((anchor, anchor)),
            ReportScope::Month => {
                let start = NaiveDate::from_ymd_opt(anchor.year(), anchor.month(), 1)
                    .ok_or_else(|| LedgerError::InvalidDate(anchor.to_string()))?;
                Ok((start, month_end(anchor.year(), anchor.month())?))
            }
            ReportScope::Year => {
                let start = NaiveDate::from_ymd_opt(anchor.year(), 1, 1)
                    .ok_or_else(|| LedgerError::InvalidDate(anchor.to_string()))?;
                let end = NaiveDate::from_ymd_opt(anchor.year(), 12, 31)
                    .ok_or_else(|| LedgerError::InvalidDate(anchor.to_string()))?;
                Ok((start, end))
            }
        }
    }

    fn period_key(&self, scope: ReportScope, anchor: NaiveDate) -> String {
        match scope {
            ReportScope::Day => anchor.format("%Y-%m-%d").to_string(),
            ReportScope::Month => anchor.format("%Y-%m").to_string(),
            ReportScope::Year => anchor.format("%Y").to_string(),
        }
    }

    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    fn parse_date(&self, s: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| LedgerError::InvalidDate(s.to_string()))
    }
}

/// Last day of a Gregorian month.
pub fn month_end(y: i32, m: u32) -> Result<NaiveDate> {
    let last_day = match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(y, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => return Err(LedgerError::InvalidDate(format!("{:04}-{:02}", y, m))),
    };
    NaiveDate::from_ymd_opt(y, m, last_day)
        .ok_or_else(|| LedgerError::InvalidDate(format!("{:04}-{:02}", y, m)))
}

/// Solar Hijri conversion arithmetic (Birashk/Khayyam break-year method,
/// the same table used by the common `jalaali` libraries). Valid for
/// Jalali years -61..3177, which covers every date the ledger can store.
pub mod jalali {
    use chrono::{Datelike, NaiveDate};

    use crate::error::{LedgerError, Result};

    const BREAKS: [i32; 20] = [
        -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262,
        2324, 2394, 2456, 3178,
    ];

    /// Leap status (0 = leap), Gregorian year, and the March day of
    /// Farvardin 1st for the given Jalali year.
    fn jal_cal(jy: i32) -> (i32, i32, i32) {
        let gy = jy + 621;
        let mut leap_j = -14;
        let mut jp = BREAKS[0];
        let mut jump = 0;
        for &b in &BREAKS[1..] {
            jump = b - jp;
            if jy < b {
                break;
            }
            leap_j += jump / 33 * 8 + jump % 33 / 4;
            jp = b;
        }
        let mut n = jy - jp;
        leap_j += n / 33 * 8 + (n % 33 + 3) / 4;
        if jump % 33 == 4 && jump - n == 4 {
            leap_j += 1;
        }
        let leap_g = gy / 4 - (gy / 100 + 1) * 3 / 4 - 150;
        let march = 20 + leap_j - leap_g;
        if jump - n < 6 {
            n = n - jump + (jump + 4) / 33 * 33;
        }
        let mut leap = ((n + 1) % 33 - 1) % 4;
        if leap == -1 {
            leap = 4;
        }
        (leap, gy, march)
    }

    fn g2d(gy: i32, gm: i32, gd: i32) -> i32 {
        let mut d = (gy + (gm - 8) / 6 + 100100) * 1461 / 4
            + (153 * ((gm + 9) % 12) + 2) / 5
            + gd
            - 34840408;
        d = d - (gy + 100100 + (gm - 8) / 6) / 100 * 3 / 4 + 752;
        d
    }

    fn d2g(jdn: i32) -> (i32, i32, i32) {
        let mut j = 4 * jdn + 139361631;
        j = j + (4 * jdn + 183187720) / 146097 * 3 / 4 * 4 - 3908;
        let i = j % 1461 / 4 * 5 + 308;
        let gd = i % 153 / 5 + 1;
        let gm = i / 153 % 12 + 1;
        let gy = j / 1461 - 100100 + (8 - gm) / 6;
        (gy, gm, gd)
    }

    fn j2d(jy: i32, jm: i32, jd: i32) -> i32 {
        let (_, gy, march) = jal_cal(jy);
        g2d(gy, 3, march) + (jm - 1) * 31 - jm / 7 * (jm - 7) + jd - 1
    }

    fn d2j(jdn: i32) -> (i32, i32, i32) {
        let (gy, _, _) = d2g(jdn);
        let mut jy = gy - 621;
        let (leap, _, march) = jal_cal(jy);
        let jdn1f = g2d(gy, 3, march);
        let mut k = jdn - jdn1f;
        if k >= 0 {
            if k <= 185 {
                return (jy, 1 + k / 31, k % 31 + 1);
            }
            k -= 186;
        } else {
            jy -= 1;
            k += 179;
            if leap == 1 {
                k += 1;
            }
        }
        (jy, 7 + k / 30, k % 30 + 1)
    }

    pub fn is_leap_year(jy: i32) -> bool {
        jal_cal(jy).0 == 0
    }

    pub fn month_length(jy: i32, jm: u32) -> u32 {
        match jm {
            1..=6 => 31,
            7..=11 => 30,
            _ => {
                if is_leap_year(jy) {
                    30
                } else {
                    29
                }
            }
        }
    }

    pub fn from_gregorian(date: NaiveDate) -> (i32, u32, u32) {
        let jdn = g2d(date.year(), date.month() as i32, date.day() as i32);
        let (jy, jm, jd) = d2j(jdn);
        (jy, jm as u32, jd as u32)
    }

    pub fn to_gregorian(jy: i32, jm: u32, jd: u32) -> Result<NaiveDate> {
        let invalid = || LedgerError::InvalidDate(format!("{:04}/{:02}/{:02}", jy, jm, jd));
        if !(BREAKS[0]..BREAKS[19]).contains(&jy) || !(1..=12).contains(&jm) {
            return Err(invalid());
        }
        if jd < 1 || jd > month_length(jy, jm) {
            return Err(invalid());
        }
        let (gy, gm, gd) = d2g(j2d(jy, jm as i32, jd as i32));
        NaiveDate::from_ymd_opt(gy, gm as u32, gd as u32).ok_or_else(invalid)
    }
}
