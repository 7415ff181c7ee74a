//! QFX (OFX 1.02 SGML) rendering for exported credit card transactions
//!
//! Produces the minimal statement response personal-finance software accepts
//! for a credit card download: sign-on block, one `CCSTMTRS` with the
//! transactions in the requested range, and a ledger balance equal to the
//! range total. Output is fully determined by its inputs so repeated exports
//! of the same range produce identical files.

use crate::types::PostedTransaction;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone};
use rust_decimal::Decimal;
use std::fmt::Write;

const HEADER: &str = "OFXHEADER:100\r\n\
DATA:OFXSGML\r\n\
VERSION:102\r\n\
SECURITY:NONE\r\n\
ENCODING:USASCII\r\n\
CHARSET:1252\r\n\
COMPRESSION:NONE\r\n\
OLDFILEUID:NONE\r\n\
NEWFILEUID:NONE\r\n\
\r\n";

/// Statement range and account a QFX document describes
#[derive(Debug, Clone)]
pub struct QfxStatement<'a> {
    pub account: &'a str,
    pub begin: NaiveDate,
    pub end: NaiveDate,
    pub time_zone: FixedOffset,
}

/// Render transactions as a QFX document
///
/// Transactions are emitted in the order given; their posting instants are
/// expressed in the statement's time zone.
pub fn render_qfx(statement: &QfxStatement<'_>, transactions: &[PostedTransaction]) -> Vec<u8> {
    let tz = statement.time_zone;
    let start = at_time(statement.begin, NaiveTime::MIN, tz);
    let end = at_time(
        statement.end,
        NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
        tz,
    );
    let balance: Decimal = transactions.iter().map(|t| t.amount).sum();

    let mut body = String::from(HEADER);
    body.push_str("<OFX>\r\n");
    body.push_str("<SIGNONMSGSRSV1><SONRS>\r\n");
    body.push_str("<STATUS><CODE>0<SEVERITY>INFO</STATUS>\r\n");
    let _ = write!(body, "<DTSERVER>{}\r\n", ofx_timestamp(&end));
    body.push_str("<LANGUAGE>ENG\r\n");
    body.push_str("</SONRS></SIGNONMSGSRSV1>\r\n");
    body.push_str("<CREDITCARDMSGSRSV1><CCSTMTTRNRS>\r\n");
    body.push_str("<TRNUID>0\r\n");
    body.push_str("<STATUS><CODE>0<SEVERITY>INFO</STATUS>\r\n");
    body.push_str("<CCSTMTRS>\r\n");
    body.push_str("<CURDEF>USD\r\n");
    let _ = write!(
        body,
        "<CCACCTFROM><ACCTID>{}</CCACCTFROM>\r\n",
        escape(statement.account)
    );
    body.push_str("<BANKTRANLIST>\r\n");
    let _ = write!(body, "<DTSTART>{}\r\n", ofx_timestamp(&start));
    let _ = write!(body, "<DTEND>{}\r\n", ofx_timestamp(&end));

    for transaction in transactions {
        let posted = transaction.posted.with_timezone(&tz);
        let kind = if transaction.amount.is_sign_negative() {
            "DEBIT"
        } else {
            "CREDIT"
        };
        body.push_str("<STMTTRN>\r\n");
        let _ = write!(body, "<TRNTYPE>{}\r\n", kind);
        let _ = write!(body, "<DTPOSTED>{}\r\n", ofx_timestamp(&posted));
        let _ = write!(body, "<TRNAMT>{:.2}\r\n", transaction.amount);
        let _ = write!(body, "<FITID>{}\r\n", escape(&transaction.id));
        let _ = write!(body, "<NAME>{}\r\n", escape(&truncate(&transaction.payee, 32)));
        body.push_str("</STMTTRN>\r\n");
    }

    body.push_str("</BANKTRANLIST>\r\n");
    let _ = write!(
        body,
        "<LEDGERBAL><BALAMT>{:.2}<DTASOF>{}</LEDGERBAL>\r\n",
        balance,
        ofx_timestamp(&end)
    );
    body.push_str("</CCSTMTRS>\r\n");
    body.push_str("</CCSTMTTRNRS></CREDITCARDMSGSRSV1>\r\n");
    body.push_str("</OFX>\r\n");

    body.into_bytes()
}

fn at_time(date: NaiveDate, time: NaiveTime, tz: FixedOffset) -> DateTime<FixedOffset> {
    let naive = date.and_time(time);
    // A fixed offset maps every local time to exactly one instant
    tz.from_local_datetime(&naive)
        .single()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

/// Format an instant as `YYYYMMDDHHMMSS[offset]`, e.g. `20220101000000[-5]`
fn ofx_timestamp(instant: &DateTime<FixedOffset>) -> String {
    let seconds = instant.offset().fix().local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let hours = seconds.abs() / 3600;
    let minutes = (seconds.abs() % 3600) / 60;
    let offset = if minutes == 0 {
        format!("{}{}", sign, hours)
    } else {
        format!("{}{}.{:02}", sign, hours, minutes)
    };

    format!("{}[{}]", instant.format("%Y%m%d%H%M%S"), offset)
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
