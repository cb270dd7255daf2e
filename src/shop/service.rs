//! Service request handlers: filing a request and closing it.

use std::io::{BufRead, Write};

use super::{returned_id, sql, Session};
use crate::engine::{ShopConnection, SqlValue};
use crate::error::{Result, ShopError};
use crate::output::write_table;

impl<C, R, O, E> Session<C, R, O, E>
where
    C: ShopConnection,
    R: BufRead,
    O: Write,
    E: Write,
{
    /// Menu 4: find or add the customer, pick or add a car, record the request
    ///
    /// Returns the new request id, or `None` when the operator declined to add
    /// a customer after an empty last-name lookup.
    pub async fn insert_service_request(&mut self) -> Result<Option<i32>> {
        let last_name = self.console.prompt("Enter last name for lookup: ")?;
        let customers = self
            .conn
            .query(sql::FIND_CUSTOMERS_BY_LAST_NAME, &[last_name.as_str().into()])
            .await?;
        write_table(self.console.out(), &customers)?;

        let customer_id = if customers.is_empty() {
            let add = self.console.confirm(
                "Last name does not exist, would you like to add a new customer? Y/N: ",
            )?;
            if !add {
                return Ok(None);
            }
            self.add_customer().await?
        } else {
            let id = self
                .console
                .prompt_int("Please input the id of the customer you would like to select: ")?;
            let id_text = id.to_string();
            let listed = (0..customers.len())
                .any(|row| customers.value_by_name(row, "id") == Some(id_text.as_str()));
            if !listed {
                return Err(ShopError::rejected(format!(
                    "Customer id {id} is not among the lookup results."
                )));
            }
            id
        };

        let vin = self.select_or_add_car(customer_id).await?;

        let odometer = self.console.prompt_int("Enter the current odometer reading on the car: ")?;
        let complaint = self.console.prompt("Enter customer's complaints with the car: ")?;

        let params: [SqlValue; 4] =
            [customer_id.into(), vin.into(), odometer.into(), complaint.into()];
        let created = self.conn.query(sql::INSERT_SERVICE_REQUEST, &params).await?;
        let rid = returned_id(&created)?;

        self.console.say(format!("Your service request id is: {rid}"))?;
        Ok(Some(rid))
    }

    /// List the customer's cars and return the VIN of the chosen (or new) one
    async fn select_or_add_car(&mut self, customer_id: i32) -> Result<String> {
        let cars = self.conn.query(sql::CUSTOMER_CARS, &[customer_id.into()]).await?;

        if cars.is_empty() {
            self.console.say("Customer has no cars on file.")?;
            return self.add_owned_car(customer_id).await;
        }

        write_table(self.console.out(), &cars)?;
        let row = self.console.prompt_int(
            "Please input the Row Number of the car you would like to select, or type 0 to add a new car: ",
        )?;

        if row == 0 {
            return self.add_owned_car(customer_id).await;
        }

        let row_text = row.to_string();
        let idx = (0..cars.len())
            .find(|&idx| cars.value_by_name(idx, "row_num") == Some(row_text.as_str()))
            .ok_or_else(|| ShopError::rejected(format!("Row number {row} is out of range.")))?;

        cars.value_by_name(idx, "vin")
            .map(str::to_string)
            .ok_or_else(|| ShopError::query_failed("Selected car has no VIN"))
    }

    /// Prompt for a car, insert it and record the customer as its owner
    async fn add_owned_car(&mut self, customer_id: i32) -> Result<String> {
        let car = self.read_car()?;
        self.insert_car(&car).await?;

        let params: [SqlValue; 2] = [customer_id.into(), car.vin.as_str().into()];
        self.conn.execute(sql::INSERT_OWNERSHIP, &params).await?;

        self.console.say("New car added to database.")?;
        Ok(car.vin)
    }

    /// Menu 5: validate and close a service request, returning the closing record id
    pub async fn close_service_request(&mut self) -> Result<i32> {
        let rid = self.console.prompt_int("Enter a service request number: ")?;
        let mid = self.console.prompt_int("Enter your mechanic id: ")?;
        let comment = self.console.prompt("Enter any comments you have about the repairs: ")?;
        let bill = self.console.prompt_int("Enter the amount to bill the customer: ")?;

        if self.conn.query(sql::MECHANIC_BY_ID, &[mid.into()]).await?.is_empty() {
            return Err(ShopError::rejected("Mechanic ID does not exist."));
        }

        if self.conn.query(sql::SERVICE_REQUEST_BY_ID, &[rid.into()]).await?.is_empty() {
            return Err(ShopError::rejected("Service request number does not exist."));
        }

        if self.conn.query(sql::SERVICE_REQUEST_NOT_AFTER_TODAY, &[rid.into()]).await?.is_empty() {
            return Err(ShopError::rejected("Service request date is after the closing date."));
        }

        if !self.conn.query(sql::CLOSED_REQUEST_BY_RID, &[rid.into()]).await?.is_empty() {
            return Err(ShopError::rejected(format!("Service request {rid} is already closed.")));
        }

        let params: [SqlValue; 4] = [rid.into(), mid.into(), comment.into(), bill.into()];
        let created = self.conn.query(sql::INSERT_CLOSED_REQUEST, &params).await?;
        let wid = returned_id(&created)?;

        self.console.say(format!("Closed request id is: {wid}"))?;
        Ok(wid)
    }
}
