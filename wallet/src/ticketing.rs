use chrono::{DateTime, TimeZone};
use tickets_common::{
    codec::{encode_timestamp, to_base_units, EncodingError},
    contract::{InvocationRequest, ScValue},
    crypto::Address,
};

// Entry points of the ticketing contract
pub const INITIALIZE: &str = "initialize";
pub const CREATE_EVENT: &str = "create_event";
pub const PURCHASE_TICKET: &str = "purchase_ticket";
pub const TRANSFER_TICKET: &str = "transfer_ticket";
pub const VERIFY_TICKET: &str = "verify_ticket";

pub fn initialize(caller: Address) -> Result<InvocationRequest, EncodingError> {
    InvocationRequest::new(INITIALIZE, Vec::new(), caller)
}

/// Build the `create_event` call from display inputs.
///
/// `name` and `description` are reduced to short symbols, `date` becomes
/// seconds since the epoch and `price` is converted from display units to
/// base units, truncating anything below one base unit.
pub fn create_event<Tz: TimeZone>(
    organizer: Address,
    name: &str,
    description: &str,
    date: &DateTime<Tz>,
    total_tickets: u32,
    price: f64,
) -> Result<InvocationRequest, EncodingError> {
    let arguments = vec![
        ScValue::Address(organizer.clone()),
        ScValue::symbol(name),
        ScValue::symbol(description),
        ScValue::U64(encode_timestamp(date)?),
        ScValue::U32(total_tickets),
        ScValue::i128(to_base_units(price)?)?,
    ];
    InvocationRequest::new(CREATE_EVENT, arguments, organizer)
}

pub fn purchase_ticket(buyer: Address, event_id: u32) -> Result<InvocationRequest, EncodingError> {
    let arguments = vec![ScValue::Address(buyer.clone()), ScValue::U32(event_id)];
    InvocationRequest::new(PURCHASE_TICKET, arguments, buyer)
}

// Signed by the current owner `from`
pub fn transfer_ticket(
    from: Address,
    to: Address,
    ticket_id: u32,
) -> Result<InvocationRequest, EncodingError> {
    let arguments = vec![
        ScValue::Address(from.clone()),
        ScValue::Address(to),
        ScValue::U32(ticket_id),
    ];
    InvocationRequest::new(TRANSFER_TICKET, arguments, from)
}

// Returns a `Bool` telling whether `owner` holds `ticket_id`
pub fn verify_ticket(
    caller: Address,
    ticket_id: u32,
    owner: Address,
) -> Result<InvocationRequest, EncodingError> {
    let arguments = vec![ScValue::U32(ticket_id), ScValue::Address(owner)];
    InvocationRequest::new(VERIFY_TICKET, arguments, caller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tickets_common::codec::{parse_datetime, Int128Parts};

    const ORGANIZER: &str = "GAAZI4TCR3TY5OJHCTJC2A4QSY6CJWJH5IAJTGKIN2ER7LBNVKOCCWN7";
    const BUYER: &str = "GBRPYHIL2CI3FNQ4BXLFMNDLFJUNPU2HY3ZMFSHONUCEOASW7QC7OX2H";

    fn address(value: &str) -> Address {
        Address::new(value).unwrap()
    }

    #[test]
    fn test_create_event_arguments() {
        let date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let request =
            create_event(address(ORGANIZER), "summerfe", "musicfes", &date, 100, 1.0).unwrap();

        assert_eq!(request.function(), CREATE_EVENT);
        assert_eq!(request.caller(), &address(ORGANIZER));
        assert_eq!(
            request.arguments(),
            &[
                ScValue::Address(address(ORGANIZER)),
                ScValue::symbol("SUMMERFE"),
                ScValue::symbol("MUSICFES"),
                ScValue::U64(1_735_689_600),
                ScValue::U32(100),
                ScValue::I128(Int128Parts {
                    hi: 0,
                    lo: 10_000_000
                }),
            ]
        );
    }

    #[test]
    fn test_create_event_from_form_input() {
        let date = parse_datetime("2025-01-01T00:00:00Z").unwrap();
        let request = create_event(
            address(ORGANIZER),
            "Summer Festival",
            "Open air music",
            &date,
            250,
            0.001,
        )
        .unwrap();

        let arguments = request.arguments();
        assert_eq!(arguments[1], ScValue::symbol("SUMMER_FE"));
        assert_eq!(arguments[2], ScValue::symbol("OPEN_AIR_"));
        assert_eq!(arguments[3], ScValue::U64(1_735_689_600));
        assert_eq!(arguments[5].as_i128(), Some(10_000));
    }

    #[test]
    fn test_create_event_rejects_bad_inputs() {
        let date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert!(create_event(address(ORGANIZER), "a", "b", &date, 1, -1.0).is_err());
        assert!(create_event(address(ORGANIZER), "a", "b", &date, 1, f64::NAN).is_err());

        let before_epoch = Utc.with_ymd_and_hms(1960, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            create_event(address(ORGANIZER), "a", "b", &before_epoch, 1, 1.0),
            Err(EncodingError::NegativeTimestamp(_))
        ));
    }

    #[test]
    fn test_ticket_calls() {
        let request = purchase_ticket(address(BUYER), 7).unwrap();
        assert_eq!(request.function(), PURCHASE_TICKET);
        assert_eq!(request.arguments()[1], ScValue::U32(7));

        let request = transfer_ticket(address(BUYER), address(ORGANIZER), 3).unwrap();
        assert_eq!(request.caller(), &address(BUYER));
        assert_eq!(request.arguments()[1], ScValue::Address(address(ORGANIZER)));

        let request = verify_ticket(address(ORGANIZER), 3, address(BUYER)).unwrap();
        assert_eq!(
            request.arguments(),
            &[ScValue::U32(3), ScValue::Address(address(BUYER))]
        );

        assert!(initialize(address(ORGANIZER)).unwrap().arguments().is_empty());
    }
}
