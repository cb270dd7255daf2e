//! Statements issued by the shop handlers.
//!
//! Written in the `PostgreSQL` dialect with `$n` placeholders; integer
//! parameters go through `CAST($n AS INTEGER)` so they bind as 32-bit values
//! whatever domain the column uses. New surrogate keys are computed inside
//! the INSERT and read back with `RETURNING`.

// Creation

pub const INSERT_CUSTOMER: &str = "\
INSERT INTO Customer(id, fname, lname, phone, address) \
VALUES ((SELECT COALESCE(MAX(id), 0) + 1 FROM Customer), $1, $2, $3, $4) \
RETURNING id";

pub const INSERT_MECHANIC: &str = "\
INSERT INTO Mechanic(id, fname, lname, experience) \
VALUES ((SELECT COALESCE(MAX(id), 0) + 1 FROM Mechanic), $1, $2, CAST($3 AS INTEGER)) \
RETURNING id";

pub const INSERT_CAR: &str = "\
INSERT INTO Car(vin, make, model, year) \
VALUES ($1, $2, $3, CAST($4 AS INTEGER))";

pub const INSERT_OWNERSHIP: &str = "\
INSERT INTO Owns(ownership_id, customer_id, car_vin) \
VALUES ((SELECT COALESCE(MAX(ownership_id), 0) + 1 FROM Owns), CAST($1 AS INTEGER), $2)";

// Service requests

pub const FIND_CUSTOMERS_BY_LAST_NAME: &str = "\
SELECT id, fname, lname, phone, address \
FROM Customer \
WHERE lname = $1 \
ORDER BY id";

pub const CUSTOMER_CARS: &str = "\
SELECT ROW_NUMBER() OVER (ORDER BY car.vin) AS row_num, car.vin, car.make, car.model, car.year \
FROM Owns o \
JOIN Car car ON car.vin = o.car_vin \
WHERE o.customer_id = CAST($1 AS INTEGER) \
ORDER BY car.vin";

pub const INSERT_SERVICE_REQUEST: &str = "\
INSERT INTO Service_Request(rid, customer_id, car_vin, date, odometer, complain) \
VALUES ((SELECT COALESCE(MAX(rid), 0) + 1 FROM Service_Request), CAST($1 AS INTEGER), $2, \
CURRENT_DATE, CAST($3 AS INTEGER), $4) \
RETURNING rid";

pub const MECHANIC_BY_ID: &str = "SELECT id FROM Mechanic WHERE id = CAST($1 AS INTEGER)";

pub const SERVICE_REQUEST_BY_ID: &str =
    "SELECT rid FROM Service_Request WHERE rid = CAST($1 AS INTEGER)";

pub const SERVICE_REQUEST_NOT_AFTER_TODAY: &str = "\
SELECT rid FROM Service_Request \
WHERE rid = CAST($1 AS INTEGER) AND date <= CURRENT_DATE";

pub const CLOSED_REQUEST_BY_RID: &str =
    "SELECT wid FROM Closed_Request WHERE rid = CAST($1 AS INTEGER)";

pub const INSERT_CLOSED_REQUEST: &str = "\
INSERT INTO Closed_Request(wid, rid, mid, date, comment, bill) \
VALUES ((SELECT COALESCE(MAX(wid), 0) + 1 FROM Closed_Request), CAST($1 AS INTEGER), \
CAST($2 AS INTEGER), CURRENT_DATE, $3, CAST($4 AS INTEGER)) \
RETURNING wid";

// Reports

pub const CUSTOMERS_WITH_BILL_BELOW: &str = "\
SELECT c.fname, c.lname, cr.bill, sr.date, cr.comment \
FROM Customer c \
JOIN Service_Request sr ON sr.customer_id = c.id \
JOIN Closed_Request cr ON cr.rid = sr.rid \
WHERE cr.bill < CAST($1 AS INTEGER) \
ORDER BY c.id, cr.wid";

pub const CUSTOMERS_WITH_MORE_CARS_THAN: &str = "\
SELECT c.fname, c.lname, COUNT(*) AS num_cars \
FROM Owns o \
JOIN Customer c ON c.id = o.customer_id \
GROUP BY c.id, c.fname, c.lname \
HAVING COUNT(*) > CAST($1 AS INTEGER) \
ORDER BY c.id";

pub const CARS_BEFORE_YEAR_UNDER_MILEAGE: &str = "\
SELECT car.make, car.model, car.year, sr.odometer \
FROM Car car \
JOIN Service_Request sr ON sr.car_vin = car.vin \
WHERE car.year < CAST($1 AS INTEGER) AND sr.odometer < CAST($2 AS INTEGER) \
ORDER BY sr.rid";

/// Exact match on the open-request count (`= k`), not a minimum
pub const CARS_WITH_OPEN_REQUEST_COUNT: &str = "\
SELECT car.make, car.model, car.vin, COUNT(*) AS cnt \
FROM Car car \
JOIN Service_Request sr ON sr.car_vin = car.vin \
WHERE NOT EXISTS (SELECT 1 FROM Closed_Request cr WHERE cr.rid = sr.rid) \
GROUP BY car.make, car.model, car.vin \
HAVING COUNT(*) = CAST($1 AS INTEGER) \
ORDER BY cnt DESC, car.vin \
LIMIT CAST($2 AS INTEGER)";

pub const CUSTOMERS_BY_TOTAL_BILL: &str = "\
SELECT c.fname, c.lname, SUM(cr.bill) AS total_bill \
FROM Customer c \
JOIN Service_Request sr ON sr.customer_id = c.id \
JOIN Closed_Request cr ON cr.rid = sr.rid \
GROUP BY c.id, c.fname, c.lname \
ORDER BY total_bill DESC, c.id";
