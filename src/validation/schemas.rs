//! Field-rule tables for the User and Card payloads.
//!
//! Messages are part of the API surface; handlers return the first one
//! verbatim, so changes here are client-visible.

use super::{bounded, string, Field, Format, Kind};

pub const USER_SCHEMA: &[Field] = &[
    Field {
        name: "name",
        label: "Name",
        required: None,
        kind: Kind::Object(USER_NAME),
    },
    Field {
        name: "email",
        label: "Email",
        required: Some("Please provide email"),
        kind: Kind::Str {
            min: None,
            max: None,
            format: Some(Format::Email),
        },
    },
    Field {
        name: "password",
        label: "Password",
        required: Some("Please provide password"),
        kind: string(),
    },
    Field {
        name: "role",
        label: "Role",
        required: None,
        kind: Kind::OneOf(&["admin", "user"]),
    },
    Field {
        name: "phone",
        label: "Phone",
        required: Some("Please provide phone number"),
        kind: Kind::Str {
            min: Some(11),
            max: None,
            format: None,
        },
    },
    Field {
        name: "address",
        label: "Address",
        required: None,
        kind: Kind::Object(USER_ADDRESS),
    },
    Field {
        name: "isBusiness",
        label: "isBusiness",
        required: None,
        kind: Kind::Bool,
    },
    Field {
        name: "image",
        label: "Image",
        required: None,
        kind: Kind::Object(USER_IMAGE),
    },
];

const USER_NAME: &[Field] = &[
    Field {
        name: "first",
        label: "First name",
        required: Some("Please provide first name"),
        kind: string(),
    },
    Field {
        name: "middle",
        label: "Middle name",
        required: None,
        kind: string(),
    },
    Field {
        name: "last",
        label: "Last name",
        required: Some("Please provide last name"),
        kind: string(),
    },
];

const USER_ADDRESS: &[Field] = &[
    Field {
        name: "state",
        label: "State",
        required: None,
        kind: string(),
    },
    Field {
        name: "country",
        label: "Country",
        required: Some("Please provide country"),
        kind: string(),
    },
    Field {
        name: "city",
        label: "City",
        required: Some("Please provide city"),
        kind: string(),
    },
    Field {
        name: "street",
        label: "Street",
        required: Some("Please provide street"),
        kind: string(),
    },
    Field {
        name: "houseNumber",
        label: "House Number",
        required: Some("Please provide houseNumber"),
        kind: string(),
    },
];

const USER_IMAGE: &[Field] = &[
    Field {
        name: "url",
        label: "Image URL",
        required: None,
        kind: string(),
    },
    Field {
        name: "alt",
        label: "Alt text",
        required: None,
        kind: string(),
    },
];

pub const CARD_SCHEMA: &[Field] = &[
    Field {
        name: "title",
        label: "Title",
        required: Some("Title is required"),
        kind: bounded(4, 75),
    },
    Field {
        name: "subtitle",
        label: "Subtitle",
        required: Some("Subtitle is required"),
        kind: bounded(5, 75),
    },
    Field {
        name: "description",
        label: "Description",
        required: Some("Description is required"),
        kind: bounded(5, 1024),
    },
    Field {
        name: "phone",
        label: "Phone",
        required: Some("Phone is required"),
        kind: bounded(9, 11),
    },
    Field {
        name: "email",
        label: "Email",
        required: Some("Email is required"),
        kind: Kind::Str {
            min: Some(5),
            max: Some(30),
            format: Some(Format::Email),
        },
    },
    Field {
        name: "web",
        label: "Web",
        required: Some("Web is required"),
        kind: Kind::Str {
            min: None,
            max: None,
            format: Some(Format::HttpUri),
        },
    },
    Field {
        name: "image",
        label: "Image",
        required: Some("Image is required"),
        kind: Kind::Object(CARD_IMAGE),
    },
    Field {
        name: "address",
        label: "Address",
        required: Some("Address is required"),
        kind: Kind::Object(CARD_ADDRESS),
    },
    Field {
        name: "bizNumber",
        label: "bizNumber",
        required: None,
        kind: Kind::Int,
    },
    Field {
        name: "likes",
        label: "Likes",
        required: None,
        kind: Kind::UuidArray,
    },
];

const CARD_IMAGE: &[Field] = &[
    Field {
        name: "url",
        label: "Image URL",
        required: Some("Image URL is required"),
        kind: string(),
    },
    Field {
        name: "alt",
        label: "Alt text",
        required: Some("Alt text is required"),
        kind: string(),
    },
];

const CARD_ADDRESS: &[Field] = &[
    Field {
        name: "state",
        label: "State",
        required: None,
        kind: string(),
    },
    Field {
        name: "country",
        label: "Country",
        required: Some("Country is required"),
        kind: string(),
    },
    Field {
        name: "city",
        label: "City",
        required: Some("City is required"),
        kind: string(),
    },
    Field {
        name: "street",
        label: "Street",
        required: Some("Street is required"),
        kind: string(),
    },
    Field {
        name: "houseNumber",
        label: "House Number",
        required: Some("House Number is required"),
        kind: Kind::Int,
    },
    Field {
        name: "zip",
        label: "ZIP",
        required: Some("ZIP is required"),
        kind: Kind::Int,
    },
];

/// Single-field schema for the business-status toggle
pub const STATUS_SCHEMA: &[Field] = &[Field {
    name: "isBusiness",
    label: "isBusiness",
    required: Some("Please provide isBusiness"),
    kind: Kind::Bool,
}];
