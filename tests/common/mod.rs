#![allow(dead_code)]

use tracing_subscriber::EnvFilter;

/// Routes library tracing through the test harness. Set `RUST_LOG=debug` to
/// see per-table scores.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Enough boilerplate to push neighbouring tables outside each other's
/// context window.
fn filler() -> String {
    format!(
        "<p>{}</p>",
        "The Company files this annual report with the Commission each year. ".repeat(25)
    )
}

fn unrelated_tables() -> String {
    let mut html = String::new();
    html.push_str(
        "<table><tr><td>Name</td><td>Position</td><td>Age</td></tr>\
         <tr><td>Jane Roe</td><td>Chief Executive Officer</td><td>54</td></tr>\
         <tr><td>John Doe</td><td>Secretary</td><td>61</td></tr></table>",
    );
    html.push_str(
        "<table><tr><td>Exhibit</td><td>Description</td></tr>\
         <tr><td>3.1</td><td>Articles of Incorporation</td></tr>\
         <tr><td>3.2</td><td>Bylaws</td></tr></table>",
    );
    html.push_str(
        "<table><tr><td>Property</td><td>Location</td><td>Square feet</td></tr>\
         <tr><td>Headquarters</td><td>Austin, Texas</td><td>120,000</td></tr></table>",
    );
    html.push_str(
        "<table><tr><td>Title of each class</td><td>Trading symbol</td></tr>\
         <tr><td>Common stock</td><td>EXMP</td></tr></table>",
    );
    html.push_str(
        "<table><tr><td>Large accelerated filer</td><td>X</td></tr>\
         <tr><td>Smaller reporting company</td><td></td></tr></table>",
    );
    html.push_str(
        "<table><tr><td>Item 1.</td><td>Business</td></tr>\
         <tr><td>Item 1A.</td><td>Risk Factors</td></tr>\
         <tr><td>Item 2.</td><td>Properties</td></tr></table>",
    );
    html.push_str(
        "<table><tr><td>Signature</td><td>Title</td></tr>\
         <tr><td>/s/ Jane Roe</td><td>Director</td></tr></table>",
    );
    html.push_str(
        "<table><tr><td>Plan category</td><td>Shares</td></tr>\
         <tr><td>Approved by holders</td><td>1,500</td></tr></table>",
    );
    html.push_str(
        "<table><tr><td>Auditor</td><td>Firm ID</td></tr>\
         <tr><td>Example LLP</td><td>42</td></tr></table>",
    );
    html
}

pub fn income_statement_table() -> &'static str {
    "<table>\
     <tr><th></th><th>2023</th><th>2024</th></tr>\
     <tr><td>(In millions, except per share amounts)</td><td></td><td></td></tr>\
     <tr><td>Revenue</td><td>$ 1,000</td><td>$ 1,200</td></tr>\
     <tr><td>Cost of revenue</td><td>(400)</td><td>(450)</td></tr>\
     <tr><td>Gross margin</td><td>600</td><td>750</td></tr>\
     <tr><td>Operating income</td><td>250</td><td>310</td></tr>\
     <tr><td>Net income</td><td>180</td><td>(20)</td></tr>\
     <tr><td>Earnings per share</td><td>$ 1.05</td><td>$ (0.12)</td></tr>\
     </table>"
}

pub fn balance_sheet_table() -> &'static str {
    "<table>\
     <tr><th></th><th>2024</th><th>2023</th></tr>\
     <tr><td>Current assets:</td><td></td><td></td></tr>\
     <tr><td>Cash and equivalents</td><td>$ 500</td><td>$ 450</td></tr>\
     <tr><td>Total current assets</td><td>800</td><td>700</td></tr>\
     <tr><td>Total assets</td><td>$ 2,000</td><td>$ 1,800</td></tr>\
     <tr><td>Current liabilities</td><td>300</td><td>280</td></tr>\
     <tr><td>Long-term debt</td><td>600</td><td>650</td></tr>\
     <tr><td>Total liabilities</td><td>900</td><td>930</td></tr>\
     <tr><td>Total stockholders equity</td><td>1,100</td><td>870</td></tr>\
     </table>"
}

pub fn cash_flow_table() -> &'static str {
    "<table>\
     <tr><th></th><th>2024</th><th>2023</th></tr>\
     <tr><td>Net income</td><td>(20)</td><td>180</td></tr>\
     <tr><td>Depreciation</td><td>40</td><td>35</td></tr>\
     <tr><td>Net cash from operating activities</td><td>120</td><td>260</td></tr>\
     <tr><td>Net cash used in investing activities</td><td>(80)</td><td>(60)</td></tr>\
     <tr><td>Net cash used in financing activities</td><td>(15)</td><td>(30)</td></tr>\
     <tr><td>Income taxes paid</td><td>12</td><td>14</td></tr>\
     </table>"
}

/// Nine unrelated tables followed by a headed income statement (table 9).
pub fn income_statement_filing() -> String {
    format!(
        "<html><body><h1>Annual Report</h1>{}{}<p>CONSOLIDATED STATEMENTS OF INCOME</p>{}</body></html>",
        unrelated_tables(),
        filler(),
        income_statement_table()
    )
}

/// All three statements, each under its heading and separated by filler.
/// Tables 0..=8 are unrelated; 9 income, 10 balance sheet, 11 cash flow.
pub fn full_filing() -> String {
    format!(
        "<html><body>{unrelated}{gap}\
         <p>CONSOLIDATED STATEMENTS OF INCOME</p>{income}{gap}\
         <p>CONSOLIDATED BALANCE SHEETS</p>{balance}{gap}\
         <p>CONSOLIDATED STATEMENTS OF CASH FLOWS</p>{cash}\
         </body></html>",
        unrelated = unrelated_tables(),
        gap = filler(),
        income = income_statement_table(),
        balance = balance_sheet_table(),
        cash = cash_flow_table(),
    )
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}
