//! Unit conversion utilities.
//!
//! Converts between units of length, weight and temperature.

use crate::hub::function::{UtilityFunction, UtilityModule};
use crate::types::{FunctionSpec, ParamKind, ParamSpec, Value, format_float};

pub const NAME: &str = "util_converter";

const DESCRIPTION: &str = "Unit conversion utilities.\n\n\
This module provides functions for converting between different units \
of measurement including length, weight, temperature, and more.";

struct Conversion {
    name: &'static str,
    doc: &'static str,
    param: &'static str,
    from_unit: &'static str,
    to_unit: &'static str,
    convert: fn(f64) -> f64,
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    (celsius * 9.0 / 5.0) + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn kilometers_to_miles(kilometers: f64) -> f64 {
    kilometers * 0.621371
}

pub fn miles_to_kilometers(miles: f64) -> f64 {
    miles * 1.60934
}

pub fn kilograms_to_pounds(kilograms: f64) -> f64 {
    kilograms * 2.20462
}

pub fn pounds_to_kilograms(pounds: f64) -> f64 {
    pounds * 0.453592
}

const CONVERSIONS: &[Conversion] = &[
    Conversion {
        name: "celsius_to_fahrenheit",
        doc: "Convert Celsius to Fahrenheit.",
        param: "celsius",
        from_unit: "°C",
        to_unit: "°F",
        convert: celsius_to_fahrenheit,
    },
    Conversion {
        name: "fahrenheit_to_celsius",
        doc: "Convert Fahrenheit to Celsius.",
        param: "fahrenheit",
        from_unit: "°F",
        to_unit: "°C",
        convert: fahrenheit_to_celsius,
    },
    Conversion {
        name: "kilometers_to_miles",
        doc: "Convert kilometers to miles.",
        param: "kilometers",
        from_unit: " km",
        to_unit: " miles",
        convert: kilometers_to_miles,
    },
    Conversion {
        name: "miles_to_kilometers",
        doc: "Convert miles to kilometers.",
        param: "miles",
        from_unit: " miles",
        to_unit: " km",
        convert: miles_to_kilometers,
    },
    Conversion {
        name: "kilograms_to_pounds",
        doc: "Convert kilograms to pounds.",
        param: "kilograms",
        from_unit: " kg",
        to_unit: " lbs",
        convert: kilograms_to_pounds,
    },
    Conversion {
        name: "pounds_to_kilograms",
        doc: "Convert pounds to kilograms.",
        param: "pounds",
        from_unit: " lbs",
        to_unit: " kg",
        convert: pounds_to_kilograms,
    },
];

pub fn module() -> UtilityModule {
    CONVERSIONS
        .iter()
        .fold(UtilityModule::new(NAME, DESCRIPTION), |module, conversion| {
            module.with_function(function(conversion))
        })
}

fn function(conversion: &'static Conversion) -> UtilityFunction {
    let spec = FunctionSpec::new(conversion.name, conversion.doc)
        .param(ParamSpec::new(conversion.param, ParamKind::Float));
    UtilityFunction::new(spec, move |args, console| {
        let input = args.float(conversion.param)?;
        let output = (conversion.convert)(input);
        console.println(format!(
            "{}{} = {}{}",
            format_float(input),
            conversion.from_unit,
            format_float(output),
            conversion.to_unit
        ));
        Ok(Some(Value::Float(output)))
    })
}
