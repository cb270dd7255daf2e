//! Main Menu
//!
//! `MenuChoice` is the dispatch tag for the session loop: the operator's
//! number maps to exactly one variant and each variant to one handler.

use crate::config::ReportThresholds;

/// One entry of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddCustomer,
    AddMechanic,
    AddCar,
    InsertServiceRequest,
    CloseServiceRequest,
    ListCustomersWithBillLessThan,
    ListCustomersWithMoreThanNCars,
    ListCarsBeforeYearUnderMileage,
    ListKCarsWithTheMostServices,
    ListCustomersByTotalBill,
    Exit,
}

impl MenuChoice {
    /// All entries in menu order
    pub const ALL: [Self; 11] = [
        Self::AddCustomer,
        Self::AddMechanic,
        Self::AddCar,
        Self::InsertServiceRequest,
        Self::CloseServiceRequest,
        Self::ListCustomersWithBillLessThan,
        Self::ListCustomersWithMoreThanNCars,
        Self::ListCarsBeforeYearUnderMileage,
        Self::ListKCarsWithTheMostServices,
        Self::ListCustomersByTotalBill,
        Self::Exit,
    ];

    /// Map an operator's number to a menu entry
    #[must_use]
    pub fn from_number(number: i32) -> Option<Self> {
        let idx = usize::try_from(number).ok()?.checked_sub(1)?;
        Self::ALL.get(idx).copied()
    }

    /// The number the operator types for this entry
    #[must_use]
    pub fn number(self) -> i32 {
        Self::ALL.iter().position(|c| *c == self).map_or(0, |idx| idx as i32 + 1)
    }

    /// Menu label, showing the configured report thresholds
    #[must_use]
    pub fn label(self, reports: &ReportThresholds) -> String {
        match self {
            Self::AddCustomer => "AddCustomer".to_string(),
            Self::AddMechanic => "AddMechanic".to_string(),
            Self::AddCar => "AddCar".to_string(),
            Self::InsertServiceRequest => "InsertServiceRequest".to_string(),
            Self::CloseServiceRequest => "CloseServiceRequest".to_string(),
            Self::ListCustomersWithBillLessThan => {
                format!("ListCustomersWithBillLessThan{}", reports.bill_below)
            }
            Self::ListCustomersWithMoreThanNCars => {
                format!("ListCustomersWithMoreThan{}Cars", reports.cars_more_than)
            }
            Self::ListCarsBeforeYearUnderMileage => format!(
                "ListCarsBefore{}With{}Miles",
                reports.car_year_before, reports.odometer_below
            ),
            Self::ListKCarsWithTheMostServices => "ListKCarsWithTheMostServices".to_string(),
            Self::ListCustomersByTotalBill => {
                "ListCustomersInDescendingOrderOfTheirTotalBill".to_string()
            }
            Self::Exit => "< EXIT".to_string(),
        }
    }
}

/// Render the full main menu
#[must_use]
pub fn render_menu(reports: &ReportThresholds) -> String {
    let mut out = String::from("MAIN MENU\n---------\n");
    for choice in MenuChoice::ALL {
        out.push_str(&format!("{}. {}\n", choice.number(), choice.label(reports)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_number() {
        assert_eq!(MenuChoice::from_number(1), Some(MenuChoice::AddCustomer));
        assert_eq!(MenuChoice::from_number(5), Some(MenuChoice::CloseServiceRequest));
        assert_eq!(MenuChoice::from_number(11), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::from_number(0), None);
        assert_eq!(MenuChoice::from_number(12), None);
        assert_eq!(MenuChoice::from_number(-3), None);
    }

    #[test]
    fn test_number_round_trips_every_entry() {
        for choice in MenuChoice::ALL {
            assert_eq!(MenuChoice::from_number(choice.number()), Some(choice));
        }
    }

    #[test]
    fn test_menu_snapshot_with_defaults() {
        insta::assert_snapshot!(render_menu(&ReportThresholds::default()), @r"
        MAIN MENU
        ---------
        1. AddCustomer
        2. AddMechanic
        3. AddCar
        4. InsertServiceRequest
        5. CloseServiceRequest
        6. ListCustomersWithBillLessThan100
        7. ListCustomersWithMoreThan20Cars
        8. ListCarsBefore1995With50000Miles
        9. ListKCarsWithTheMostServices
        10. ListCustomersInDescendingOrderOfTheirTotalBill
        11. < EXIT
        ");
    }

    #[test]
    fn test_labels_follow_thresholds() {
        let reports = ReportThresholds { bill_below: 250, ..Default::default() };
        assert_eq!(
            MenuChoice::ListCustomersWithBillLessThan.label(&reports),
            "ListCustomersWithBillLessThan250"
        );
    }
}
