//! Read-only reports. Each prints its result table followed by
//! `total row(s): <N>` and returns the row count.

use std::io::{BufRead, Write};

use super::{sql, Session};
use crate::engine::{ShopConnection, SqlValue};
use crate::error::{Result, ShopError};
use crate::output::{print_query, row_count_line};

impl<C, R, O, E> Session<C, R, O, E>
where
    C: ShopConnection,
    R: BufRead,
    O: Write,
    E: Write,
{
    /// Menu 6: closed requests billed below the configured amount
    pub async fn list_customers_with_bill_less_than(&mut self) -> Result<usize> {
        let threshold = self.config.reports.bill_below;
        self.print_report(sql::CUSTOMERS_WITH_BILL_BELOW, &[threshold.into()]).await
    }

    /// Menu 7: customers owning strictly more than the configured number of cars
    pub async fn list_customers_with_more_than_n_cars(&mut self) -> Result<usize> {
        let threshold = self.config.reports.cars_more_than;
        self.print_report(sql::CUSTOMERS_WITH_MORE_CARS_THAN, &[threshold.into()]).await
    }

    /// Menu 8: service requests on old cars with low mileage
    pub async fn list_cars_before_year_under_mileage(&mut self) -> Result<usize> {
        let reports = self.config.reports;
        let params: [SqlValue; 2] = [reports.car_year_before.into(), reports.odometer_below.into()];
        self.print_report(sql::CARS_BEFORE_YEAR_UNDER_MILEAGE, &params).await
    }

    /// Menu 9: up to `n` cars having exactly `k` open service requests
    pub async fn list_k_cars_with_the_most_services(&mut self) -> Result<usize> {
        let open = self.console.prompt_int("Cars should have how many Service Orders Open? ")?;
        let limit = self.console.prompt_int("How many cars would you like to see ")?;

        if open < 0 || limit < 0 {
            return Err(ShopError::invalid_input("counts must not be negative"));
        }

        self.print_report(sql::CARS_WITH_OPEN_REQUEST_COUNT, &[open.into(), limit.into()]).await
    }

    /// Menu 10: customers ranked by the total of their bills
    pub async fn list_customers_by_total_bill(&mut self) -> Result<usize> {
        self.print_report(sql::CUSTOMERS_BY_TOTAL_BILL, &[]).await
    }

    async fn print_report(&mut self, sql: &str, params: &[SqlValue]) -> Result<usize> {
        let count = print_query(&mut self.conn, self.console.out(), sql, params).await?;
        self.console.say(row_count_line(count))?;
        Ok(count)
    }
}
