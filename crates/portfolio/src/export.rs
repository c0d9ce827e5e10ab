use models::FdRecord;

/// Default filename offered for the exported bytes.
pub const EXPORT_FILENAME: &str = "fd_portfolio_backup.csv";

const HEADER: &str = "Deposits,Bank,Account No,Amount,Rate %,Period,Interest Due,Maturity,W.H. TAX";

/// Serialize the full record list as comma-separated text, bit-exact
/// for a given list: fixed header, one row per record in list order,
/// rows joined by `\n` with no trailing delimiter.
///
/// Exactly the depositor and account-number fields are wrapped in
/// double quotes (they tolerate embedded commas); embedded quote
/// characters are not escaped. The other six fields are emitted bare,
/// as entered.
pub fn export_csv(records: &[FdRecord]) -> String {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(HEADER.to_string());
    for r in records {
        rows.push(format!(
            "\"{}\",{},\"{}\",{},{},{},{},{},{}",
            r.depositor, r.bank, r.acc_no, r.amount, r.rate, r.period, r.interest, r.maturity, r.tax
        ));
    }
    rows.join("\n")
}
