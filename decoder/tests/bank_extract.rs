use mt940_decoder::parse_statement;
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

const STATEMENT: &str = "\
:20:EXTRACT
:25:TR330006100519786457841326
:28C:1/1
:60F:C240301TRY1000,00
:61:2403010301C500,00NTRFREF1
:86:Gelen havale
:61:2403020302D200,00NTRFREF2
:86:Giden EFT
:62F:C240302TRY1300,00
";

#[test]
fn running_balances_replay_from_opening() {
    let stmt = parse_statement(STATEMENT.as_bytes(), "extract.sta").unwrap();
    let extract = stmt.to_bank_extract();

    let balances: Vec<Decimal> = extract.rows.iter().map(|r| r.running_balance).collect();
    assert_eq!(balances, vec![dec("1500"), dec("1300")]);

    let opening = extract.totals.opening_balance_signed.unwrap();
    assert_eq!(opening, dec("1000"));
    assert_eq!(
        extract.final_balance(),
        opening + stmt.totals().net_change,
        "last running balance should be opening + net change"
    );

    assert_eq!(extract.totals.credit_in, dec("500"));
    assert_eq!(extract.totals.debit_out, dec("200"));
    assert_eq!(extract.totals.closing_balance_signed, Some(dec("1300")));
}

#[test]
fn extract_carries_header_and_period() {
    let extract = parse_statement(STATEMENT.as_bytes(), "extract.sta")
        .unwrap()
        .to_bank_extract();

    assert_eq!(extract.bank, "Türkiye İş Bankası");
    assert_eq!(extract.account_id, "TR330006100519786457841326");
    assert_eq!(extract.period, "2024-03");
    assert_eq!(extract.rows[0].narrative, "Gelen havale");
    assert_eq!(extract.rows[1].debit, dec("200"));
}

#[test]
fn projection_is_idempotent() {
    let stmt = parse_statement(STATEMENT.as_bytes(), "extract.sta").unwrap();

    let mut first = Vec::new();
    let mut second = Vec::new();
    stmt.to_bank_extract().write_csv(&mut first).unwrap();
    stmt.to_bank_extract().write_csv(&mut second).unwrap();

    assert_eq!(stmt.to_bank_extract(), stmt.to_bank_extract());
    assert_eq!(first, second);
}

#[test]
fn running_balance_may_differ_from_declared_closing() {
    let input = STATEMENT.replace(":62F:C240302TRY1300,00", ":62F:C240302TRY1299,00");
    let stmt = parse_statement(input.as_bytes(), "drift.sta").unwrap();
    let extract = stmt.to_bank_extract();

    assert_eq!(extract.final_balance(), dec("1300"));
    assert_eq!(extract.totals.closing_balance_signed, Some(dec("1299")));
    assert_eq!(stmt.reconcile().difference(), Some(dec("-1")));
}
