//! Plain-text rendering of catalog rows.

use cdb_postgres::model::{Company, ComputerView};

use super::dates::format_date;

/// Renders a computer as one listing line.
///
/// The discontinuation clause only follows an introduction clause.
pub fn computer_line(computer: &ComputerView) -> String {
    let mut line = format!("{} - {}", computer.id, computer.name.trim());

    if let Some(introduced) = computer.introduced() {
        line.push_str(&format!(". Introduced at {}", format_date(introduced)));
        if let Some(discontinued) = computer.discontinued() {
            line.push_str(&format!(". Discontinued at {}", format_date(discontinued)));
        }
    }

    line.push('.');

    if let Some(company) = &computer.company_name {
        line.push_str(&format!(" It was created by {company}."));
    }

    line
}

/// Renders a computer with each clause on its own line.
pub fn computer_detail(computer: &ComputerView) -> String {
    let mut lines = vec![format!("Computer : {} - {}", computer.id, computer.name.trim())];

    if let Some(introduced) = computer.introduced() {
        lines.push(format!("Introduced at {}", format_date(introduced)));
        if let Some(discontinued) = computer.discontinued() {
            lines.push(format!("Discontinued at {}", format_date(discontinued)));
        }
    }

    if let Some(company) = &computer.company_name {
        lines.push(format!("It was created by {company}"));
    }

    lines.join("\n")
}

/// Renders a company as one listing line.
pub fn company_line(company: &Company) -> String {
    format!("{} - {}.", company.id, company.name.trim())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn view(introduced: Option<jiff::civil::Date>, discontinued: Option<jiff::civil::Date>) -> ComputerView {
        ComputerView {
            id: 7,
            name: "Apple II ".to_owned(),
            introduced: introduced.map(Into::into),
            discontinued: discontinued.map(Into::into),
            company_id: Some(1),
            company_name: Some("Apple".to_owned()),
        }
    }

    #[test]
    fn full_line() {
        let computer = view(Some(date(1977, 4, 1)), Some(date(1993, 10, 1)));
        assert_eq!(
            computer_line(&computer),
            "7 - Apple II. Introduced at 01/04/1977. Discontinued at 01/10/1993. \
             It was created by Apple."
        );
    }

    #[test]
    fn discontinued_needs_introduced() {
        let computer = view(None, Some(date(1993, 10, 1)));
        assert_eq!(computer_line(&computer), "7 - Apple II. It was created by Apple.");
    }

    #[test]
    fn bare_line() {
        let computer = ComputerView {
            company_id: None,
            company_name: None,
            ..view(None, None)
        };
        assert_eq!(computer_line(&computer), "7 - Apple II.");
    }

    #[test]
    fn detail_puts_clauses_on_their_own_lines() {
        let computer = view(Some(date(1977, 4, 1)), None);
        assert_eq!(
            computer_detail(&computer),
            "Computer : 7 - Apple II\nIntroduced at 01/04/1977\nIt was created by Apple"
        );
    }

    #[test]
    fn company() {
        let company = Company {
            id: 3,
            name: "RCA".to_owned(),
        };
        assert_eq!(company_line(&company), "3 - RCA.");
    }
}
