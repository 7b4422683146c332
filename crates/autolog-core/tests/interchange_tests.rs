use autolog_core::interchange::{
    export_vehicles, import_fuel_entries, import_other_expenses, import_vehicles, parse_payload,
    RecordKind,
};
use autolog_core::model::{Financing, FuelType, PaymentKind, Vehicle, VehicleRecord};
use autolog_core::ValidationError;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;

#[test]
fn test_bad_record_does_not_abort_batch() {
    let payload = json!([
        {"year": 2019, "make": "Subaru", "model": "Outback", "purchasedDate": "2019-06-01"},
        {"year": 2020, "make": "Toyota", "model": "RAV4", "purchasedDate": "06/01/2020"},
        {"year": 2021, "make": "Ford", "model": "F-150", "fuelType": "diesel"}
    ]);
    let report = import_vehicles(&payload, 100).unwrap();

    assert_eq!(report.accepted.len(), 2);
    assert_eq!(report.errors.len(), 1);
    let err = &report.errors[0];
    assert_eq!(err.record, RecordKind::Vehicle);
    assert_eq!(err.position, 2);
    assert_eq!(err.error.field(), "purchasedDate");
    assert!(err.to_string().starts_with("Vehicle 2: "));

    let ids: Vec<u64> = report.accepted.iter().map(|r| r.vehicle.id).collect();
    assert_eq!(ids, vec![100, 101]);
    assert_eq!(report.accepted[1].vehicle.fuel_type, FuelType::Diesel);
}

#[test]
fn test_envelope_and_single_object_shapes() {
    let single = json!({"year": 2018, "make": "Honda", "model": "Fit"});
    assert_eq!(import_vehicles(&single, 1).unwrap().accepted.len(), 1);

    let envelope = json!({"vehicles": [single.clone(), single]});
    assert_eq!(import_vehicles(&envelope, 1).unwrap().accepted.len(), 2);

    assert!(import_vehicles(&json!(42), 1).is_err());
    assert!(parse_payload("{not json").is_err());
}

#[test]
fn test_required_and_enumerated_fields() {
    let payload = json!([
        {"make": "Honda", "model": "Fit"},
        {"year": 2018, "make": "Honda", "model": "Fit", "fuelType": "steam"},
        {"year": 1850, "make": "Benz", "model": "Wagon"}
    ]);
    let report = import_vehicles(&payload, 1).unwrap();
    assert!(report.accepted.is_empty());
    assert_eq!(
        report.errors[0].error,
        ValidationError::FailsRequired {
            field: "year".into()
        }
    );
    assert!(matches!(report.errors[1].error, ValidationError::FailsFormat { .. }));
    assert!(matches!(report.errors[2].error, ValidationError::FailsBounds { .. }));
}

#[test]
fn test_nested_children_and_financing() {
    let payload = json!({"vehicles": [{
        "year": 2022,
        "make": "Toyota",
        "model": "Corolla",
        "vinNumber": "JTDEPRAE0NJ000001",
        "purchasedDate": "2022-05-01",
        "purchasedPrice": "23450.00",
        "purchasedOdometer": 12,
        "loanInfo": {
            "startDate": "2022-05-01",
            "amount": "20000",
            "interestRate": 4.9,
            "termMonths": 60,
            "paymentDay": 15,
            "autoPayment": true
        },
        "fuelEntries": [
            {"date": "2022-06-01", "odometer": 700, "gallons": "11.2", "cost": "52.10"},
            {"date": "2022-05-15", "odometer": 350, "gallons": "9.5", "cost": "44.00"},
            {"date": "2022-07-01", "odometer": 5000, "gallons": "10", "cost": "40"}
        ],
        "maintenance": {
            "oil": [{"date": "2022-06-10", "odometer": 900, "cost": "49.99"}]
        },
        "otherExpenses": [
            {"expenseType": "insurance", "date": "2022-05-01", "cost": "812.40"},
            {"expenseType": "vehicle_payment", "paymentKind": "loan_installment",
             "date": "2022-05-15", "cost": "376.50"}
        ]
    }]});

    let report = import_vehicles(&payload, 1).unwrap();
    assert_eq!(report.accepted.len(), 1);
    let record = &report.accepted[0];

    let loan = record.vehicle.financing.loan().unwrap();
    assert_eq!(loan.principal, Some(dec!(20000)));
    assert_eq!(loan.annual_rate, Some(dec!(4.9)));
    assert!(loan.auto_payment);

    // Out-of-order entries are each sequenced against their neighbours
    assert_eq!(record.fuel_entries.len(), 2);
    let june = record
        .fuel_entries
        .iter()
        .find(|e| e.odometer == 700)
        .unwrap();
    // (700 - 350) / 11.2, measured from the May fill-up
    assert_eq!(june.mpg(), Some(dec!(31.25)));
    assert_eq!(record.maintenance_entries.len(), 1);
    assert_eq!(record.other_expenses.len(), 2);
    assert_eq!(record.loan_installments_made(), 1);

    // The 4,300-mile jump is the only rejected child
    assert_eq!(report.errors.len(), 1);
    let err = &report.errors[0];
    assert_eq!(err.record, RecordKind::FuelEntry);
    assert_eq!(err.parent, Some(1));
    assert_eq!(err.position, 3);
    assert!(matches!(err.error, ValidationError::FailsPlausibility { .. }));
}

fn maverick() -> VehicleRecord {
    let mut v = Vehicle::new(4, 2022, "Ford", "Maverick", FuelType::Hybrid);
    v.purchased_odometer = Some(10_000);
    VehicleRecord::new(v)
}

#[test]
fn test_fuel_batch_order_does_not_change_entries() {
    let january = json!({"date": "2024-01-10", "odometer": 10500, "gallons": "10", "cost": "40"});
    let march = json!({"date": "2024-03-10", "odometer": 10900, "gallons": "10", "cost": "40"});

    let mut in_order = maverick();
    let report = import_fuel_entries(&mut in_order, &json!([january.clone(), march.clone()])).unwrap();
    assert!(report.is_clean());

    let mut reversed = maverick();
    let report = import_fuel_entries(&mut reversed, &json!([march, january])).unwrap();
    assert!(report.is_clean());

    assert_eq!(reversed.fuel_entries, in_order.fuel_entries);
    assert_eq!(reversed.fuel_entries[1].mpg(), Some(dec!(40)));
}

#[test]
fn test_reversed_batch_is_not_judged_against_purchase_reading() {
    let mut record = maverick();
    let payload = json!([
        {"date": "2024-03-10", "odometer": 11200, "gallons": "20", "cost": "80"},
        {"date": "2024-01-10", "odometer": 10500, "gallons": "15", "cost": "60"},
        {"date": "2024-04-01", "odometer": 10400, "gallons": "10", "cost": "40"}
    ]);
    let report = import_fuel_entries(&mut record, &payload).unwrap();

    assert_eq!(report.accepted.len(), 2);
    // Rejected entry keeps its payload position
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].position, 3);
    assert!(matches!(report.errors[0].error, ValidationError::FailsSequence { .. }));
}

#[test]
fn test_standalone_electric_fuel_import() {
    let mut v = Vehicle::new(5, 2023, "Tesla", "Model Y", FuelType::Electric);
    v.purchased_odometer = Some(5_000);
    let mut record = VehicleRecord::new(v);

    let payload = json!({"fuelEntries": [
        {"date": "2024-03-01", "odometer": 5300,
         "kwhPerMile": "0.300", "costPerKwh": "0.125", "costPerGallonReference": "4.50"},
        {"date": "2024-03-08", "odometer": 5600, "kwhPerMile": "0.300"}
    ]});
    let report = import_fuel_entries(&mut record, &payload).unwrap();

    assert_eq!(report.accepted.len(), 1);
    assert_eq!(report.accepted[0].mpge(), Some(dec!(120.0)));
    assert_eq!(report.accepted[0].cost, dec!(11.25));
    assert_eq!(
        report.errors[0].error,
        ValidationError::FailsRequired {
            field: "costPerKwh".into()
        }
    );
    assert_eq!(record.fuel_entries.len(), 1);
}

#[test]
fn test_legacy_payment_expenses() {
    let mut record = VehicleRecord::new(Vehicle::new(1, 2020, "Mini", "Cooper", FuelType::Gasoline));
    let payload = json!([
        {"expenseType": "loan", "date": "2021-01-01", "cost": "3000", "notes": "Down payment"},
        {"expenseType": "loan", "date": "2021-02-01", "cost": "310.22", "notes": "Loan payment 1 of 48"},
        {"expenseType": "vehicle_payment", "date": "2021-03-01", "cost": "310.22", "notes": "March"}
    ]);
    let report = import_other_expenses(&mut record, &payload).unwrap();

    assert_eq!(report.accepted.len(), 2);
    assert_eq!(record.count_payments(PaymentKind::DownPayment), 1);
    assert_eq!(record.count_payments(PaymentKind::LoanInstallment), 1);
    assert_eq!(report.errors[0].position, 3);
    assert_eq!(report.errors[0].error.field(), "paymentKind");
}

#[test]
fn test_export_reimports_to_same_records() {
    let payload = json!({"year": 2020, "make": "Nissan", "model": "Leaf", "fuelType": "electric",
        "purchasedDate": "2020-09-12", "purchasedOdometer": 3,
        "leaseInfo": {"startDate": "2020-09-12", "monthlyPayment": "289.00", "termMonths": 36,
                      "paymentDay": 12, "autoPayment": true},
        "fuelEntries": [{"date": "2020-10-01", "odometer": 403, "kwhPerMile": "0.28",
                         "costPerKwh": "0.14", "costPerGallonReference": "3.10"}],
        "otherExpenses": [{"expenseType": "registration", "date": "2020-09-12", "cost": "98.00"}]
    });
    let original = import_vehicles(&payload, 1).unwrap();
    assert!(original.is_clean());

    let exported = serde_json::to_value(export_vehicles(&original.accepted)).unwrap();
    assert_eq!(exported["vehicles"][0]["leaseInfo"]["monthlyPayment"], "289.00");
    assert_eq!(exported["vehicles"][0]["fuelEntries"][0]["mpge"], "79.1");

    let again = import_vehicles(&exported, 1).unwrap();
    assert!(again.is_clean());
    assert_eq!(again.accepted, original.accepted);
    assert!(matches!(again.accepted[0].vehicle.financing, Financing::Lease(_)));
}
