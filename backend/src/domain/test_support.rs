//! Shared fixtures for domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use super::{
    DataType, DataTypeDraft, DataTypeId, FieldDraft, FieldType, Frequency, UserId,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) struct FixtureClock {
    pub(crate) utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn field_draft(name: &str, field_type: FieldType, required: bool) -> FieldDraft {
    FieldDraft {
        id: None,
        name: name.to_owned(),
        field_type,
        required,
        options: Vec::new(),
        default_value: None,
    }
}

pub(crate) fn weight_draft() -> DataTypeDraft {
    DataTypeDraft {
        name: "Weight".to_owned(),
        description: Some("Morning weigh-in".to_owned()),
        frequency: Frequency::Daily,
        fields: vec![
            field_draft("kg", FieldType::Number, false),
            field_draft("note", FieldType::Text, false),
        ],
        color: None,
        icon: None,
    }
}

pub(crate) fn weight_data_type(owner: UserId) -> DataType {
    weight_draft()
        .validate()
        .expect("fixture draft is valid")
        .into_data_type(DataTypeId::random(), owner, fixture_timestamp(), fixture_timestamp())
}
