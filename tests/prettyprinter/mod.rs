use slicejson::{InvalidFloatValueError, InvalidIntValueError, InvalidStringValueError, Reader, TokenKind};
use thiserror::Error;

enum Type {
    Object,
    Array,
}

/// An error that can happen when pretty-printing a JSON string. Either the
/// string cannot be parsed or a value cannot be converted.
#[derive(Error, Debug)]
pub enum PrettyPrintError {
    #[error("{0}")]
    InvalidStringValue(#[from] InvalidStringValueError),

    #[error("{0}")]
    InvalidIntValue(#[from] InvalidIntValueError),

    #[error("{0}")]
    InvalidFloatValue(#[from] InvalidFloatValueError),
}

/// Demonstrates how [`Reader`] can drive a pretty-printer. Note: this is not
/// a perfect implementation of a pretty-printer. The output could still be
/// nicer.
pub struct PrettyPrinter {
    result: String,
    types: Vec<Type>,
    element_counts: Vec<i32>,
    level: i32,
}

impl PrettyPrinter {
    pub fn new() -> Self {
        PrettyPrinter {
            result: String::new(),
            types: vec![],
            element_counts: vec![],
            level: 0,
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.level {
            self.result.push_str("  ");
        }
    }

    fn on_start_object(&mut self) {
        self.on_value();
        self.result.push_str("{\n");
        self.level += 1;
        self.indent();
        self.element_counts.push(0);
        self.types.push(Type::Object);
    }

    fn on_end_object(&mut self) {
        self.level -= 1;
        self.result.push('\n');
        self.indent();
        self.result.push('}');
        self.element_counts.pop();
        self.types.pop();
    }

    fn on_start_array(&mut self) {
        self.on_value();
        self.result.push_str("[\n");
        self.level += 1;
        self.indent();
        self.element_counts.push(0);
        self.types.push(Type::Array);
    }

    fn on_end_array(&mut self) {
        self.level -= 1;
        self.result.push('\n');
        self.indent();
        self.result.push(']');
        self.element_counts.pop();
        self.types.pop();
    }

    fn on_property_name(&mut self, name: &str) {
        if let Some(last) = self.element_counts.last() {
            if *last > 0 {
                self.result.push_str(",\n");
                self.indent();
            }
        }

        self.result.push('"');
        self.result.push_str(name);
        self.result.push_str("\": ");

        if let Some(last) = self.element_counts.pop() {
            self.element_counts.push(last + 1);
        }
    }

    fn on_value(&mut self) {
        if let Some(Type::Array) = self.types.last() {
            if let Some(last) = self.element_counts.pop() {
                if last > 0 {
                    self.result.push_str(", ");
                }
                self.element_counts.push(last + 1);
            }
        }
    }

    fn on_value_string(&mut self, value: &str) {
        self.on_value();
        self.result.push('"');
        self.result.push_str(value);
        self.result.push('"');
    }

    fn on_value_number(&mut self, value: i64) {
        self.on_value();
        self.result.push_str(&value.to_string());
    }

    fn on_value_float(&mut self, value: f64) {
        self.on_value();
        self.result.push_str(&value.to_string());
    }

    fn on_value_bool(&mut self, value: bool) {
        self.on_value();
        self.result.push_str(&value.to_string());
    }

    fn on_value_null(&mut self) {
        self.on_value();
        self.result.push_str("null");
    }

    /// Feed the current token of `reader` into the pretty-printer. Does not
    /// advance `reader` itself; call this once per successful
    /// [`Reader::advance()`].
    pub fn on_token(&mut self, reader: &Reader) -> Result<(), PrettyPrintError> {
        match reader.token_kind() {
            TokenKind::None => {}
            TokenKind::StartObject => self.on_start_object(),
            TokenKind::EndObject => self.on_end_object(),
            TokenKind::StartArray => self.on_start_array(),
            TokenKind::EndArray => self.on_end_array(),
            TokenKind::PropertyName => self.on_property_name(reader.as_str()?),
            TokenKind::String => self.on_value_string(reader.as_str()?),
            TokenKind::Number => match reader.as_i64() {
                Ok(i) => self.on_value_number(i),
                Err(_) => self.on_value_float(reader.as_f64()?),
            },
            TokenKind::True => self.on_value_bool(true),
            TokenKind::False => self.on_value_bool(false),
            TokenKind::Null => self.on_value_null(),
            TokenKind::Comment => {}
        }
        Ok(())
    }

    pub fn get_result(&self) -> &str {
        &self.result
    }
}
