//! Core ProcHaus functionality
//!
//! This module contains the procedure invoker. Every call walks the same
//! path: prepare a parameter bag from the caller's [`CallParams`], bind it,
//! execute, read outputs back and apply the error-code convention.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::str::FromStr;
use std::sync::Arc;

use cache_system::{QueryIdentity, StrategyCache};
use config::{AppConfig, InvokerConfig};
use param_bag::{
    BindOptions, ParamOptions, ParamSource, ParameterBag, ParameterDirection, ProcedureCommand,
};
use type_mapping::{DbType, DbValue, Row};

use crate::capabilities::FeatureSupport;
use crate::connection::{read_set, read_sets, Connection};
use crate::errors::{InvokeError, ProcHausError, SystemFault};
use crate::params::{CallParams, ERROR_CODE_PARAM, ERROR_MESSAGE_PARAM, SUCCESS_CODE};
use crate::results::{map_rows, ResultSets};

/// Stored-procedure invoker.
///
/// Clones share one strategy cache.
#[derive(Debug, Clone)]
pub struct ProcHaus {
    cache: Arc<StrategyCache>,
    config: InvokerConfig,
}

impl ProcHaus {
    /// Create an invoker with default settings over a shared cache
    pub fn new(cache: Arc<StrategyCache>) -> Self {
        Self::with_config(cache, InvokerConfig::default())
    }

    pub fn with_config(cache: Arc<StrategyCache>, config: InvokerConfig) -> Self {
        Self { cache, config }
    }

    /// Create an invoker and a fresh cache from application configuration
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ProcHausError> {
        config.validate()?;
        let cache = Arc::new(StrategyCache::with_config(&config.cache)?);
        Ok(Self::with_config(cache, config.invoker.clone()))
    }

    /// Create an invoker from the configuration file named by the environment
    pub fn load() -> Result<Self, ProcHausError> {
        let config = AppConfig::load()?;
        Self::from_app_config(&config)
    }

    pub fn cache(&self) -> &Arc<StrategyCache> {
        &self.cache
    }

    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    /// Run a procedure without reading result sets
    pub fn execute<C>(
        &self,
        conn: &mut C,
        procedure: &str,
        params: &mut CallParams,
    ) -> Result<(), InvokeError>
    where
        C: Connection + ?Sized,
    {
        self.invoke(conn, procedure, params, |conn, command| {
            conn.execute(command)?;
            Ok(())
        })
    }

    /// Run a procedure and map its single result set into `T`
    pub fn query<T, C>(
        &self,
        conn: &mut C,
        procedure: &str,
        params: &mut CallParams,
    ) -> Result<Vec<T>, InvokeError>
    where
        T: DeserializeOwned,
        C: Connection + ?Sized,
    {
        self.invoke(conn, procedure, params, |conn, command| {
            let rows = {
                let mut cursor = conn.query(command)?;
                read_set(cursor.as_mut())?
            };
            Ok(map_rows(&rows)?)
        })
    }

    /// Run a procedure and map consecutive result sets into a tuple of
    /// vectors, e.g. `(Vec<Order>, Vec<Line>)`
    pub fn query_multiple<R, C>(
        &self,
        conn: &mut C,
        procedure: &str,
        params: &mut CallParams,
    ) -> Result<R, InvokeError>
    where
        R: ResultSets,
        C: Connection + ?Sized,
    {
        self.invoke(conn, procedure, params, |conn, command| {
            let sets = {
                let mut cursor = conn.query_multiple(command)?;
                read_sets(cursor.as_mut(), R::COUNT)?
            };
            Ok(R::from_sets(sets)?)
        })
    }

    /// Run a procedure and drain `count` result sets as raw rows
    pub fn query_sets<C>(
        &self,
        conn: &mut C,
        procedure: &str,
        params: &mut CallParams,
        count: usize,
    ) -> Result<Vec<Vec<Row>>, InvokeError>
    where
        C: Connection + ?Sized,
    {
        self.invoke(conn, procedure, params, |conn, command| {
            let mut cursor = conn.query_multiple(command)?;
            Ok(read_sets(cursor.as_mut(), count)?)
        })
    }

    fn invoke<C, T, F>(
        &self,
        conn: &mut C,
        procedure: &str,
        params: &mut CallParams,
        run: F,
    ) -> Result<T, InvokeError>
    where
        C: Connection + ?Sized,
        F: FnOnce(&mut C, &ProcedureCommand) -> Result<T, SystemFault>,
    {
        crate::debug_log!(procedure, connection = conn.kind(), "invoking procedure");

        match self.run_bound(conn, procedure, params, run) {
            Ok(value) => {
                check_errors(procedure, params)?;
                crate::debug_log!(procedure, "procedure completed");
                Ok(value)
            }
            Err(fault) => Err(self.system_failure(procedure, params, fault)),
        }
    }

    fn run_bound<C, T, F>(
        &self,
        conn: &mut C,
        procedure: &str,
        params: &mut CallParams,
        run: F,
    ) -> Result<T, SystemFault>
    where
        C: Connection + ?Sized,
        F: FnOnce(&mut C, &ProcedureCommand) -> Result<T, SystemFault>,
    {
        let features = FeatureSupport::for_connection(&*conn);
        let options = BindOptions {
            default_string_size: self.config.default_string_size,
            arrays: features.arrays,
        };
        let identity = QueryIdentity::new(procedure, conn.kind());

        let mut bag = self.prepare(params);
        let mut command = ProcedureCommand::new(procedure);
        bag.bind(&mut command, &identity, &self.cache, &options)?;

        let value = run(conn, &command)?;
        adjust_results(&bag, params)?;
        crate::trace_log!(procedure, outputs = params.output().len(), "outputs read back");
        Ok(value)
    }

    fn prepare(&self, params: &CallParams) -> ParameterBag {
        let mut bag = ParameterBag::new();

        for (name, value) in params.input() {
            bag.add(name, value.clone());
        }

        for (name, value) in params.output() {
            match (params.out_size(name), value) {
                (Some(size), _) => {
                    bag.add_with(name, value.clone(), ParamOptions::output().size(size));
                }
                // Decimal outputs are bound as fixed-size strings
                (None, DbValue::Decimal(default)) => {
                    bag.add_with(
                        name,
                        DbValue::String(default.to_string()),
                        ParamOptions::output()
                            .db_type(DbType::String)
                            .size(self.config.decimal_buffer_size),
                    );
                }
                (None, _) => {
                    bag.add_with(name, value.clone(), ParamOptions::output());
                }
            }
        }

        if let Some((name, value)) = params.return_value() {
            bag.add_with(
                name,
                value.clone(),
                ParamOptions::default().direction(ParameterDirection::ReturnValue),
            );
        }

        for template in params.templates() {
            bag.import_from(ParamSource::Template(Arc::clone(template)));
        }

        bag
    }

    fn system_failure(
        &self,
        procedure: &str,
        params: &mut CallParams,
        fault: SystemFault,
    ) -> InvokeError {
        let code = self.config.system_error_code;
        let message = format!("{} : {}", self.config.system_error_prefix, fault);
        params.set_output(ERROR_CODE_PARAM, code);
        params.set_output(ERROR_MESSAGE_PARAM, message.as_str());

        tracing::warn!(procedure, code, error = %fault, "procedure invocation failed");

        InvokeError::System {
            procedure: procedure.to_string(),
            code,
            diagnostic: diagnostic(&message, procedure, params),
            message,
        }
    }
}

/// Copy output and return values from the bound parameters into `params`
fn adjust_results(bag: &ParameterBag, params: &mut CallParams) -> Result<(), SystemFault> {
    let names: Vec<String> = params.output().keys().cloned().collect();
    for name in names {
        let fresh = bag.readback(&name)?;
        let string_decimal = matches!(params.output_value(&name), Some(DbValue::Decimal(_)))
            && params.out_size(&name).is_none();

        if string_decimal {
            // An unparseable buffer keeps the caller's default
            if let Some(parsed) = fresh.as_ref().and_then(decimal_from_buffer) {
                params.set_output(&name, parsed);
            }
        } else {
            params.set_output(&name, fresh.unwrap_or_default());
        }
    }

    if let Some(name) = params.return_value().map(|(name, _)| name.to_string()) {
        let fresh = bag.readback(&name)?;
        params.set_return_value(fresh.unwrap_or_default());
    }
    Ok(())
}

fn check_errors(procedure: &str, params: &CallParams) -> Result<(), InvokeError> {
    let code = params.error_code();
    if code == SUCCESS_CODE {
        return Ok(());
    }

    let message = params.error_message();
    tracing::warn!(procedure, code, message = %message, "procedure reported an error");

    Err(InvokeError::Procedure {
        procedure: procedure.to_string(),
        code,
        diagnostic: diagnostic(&message, procedure, params),
        message,
    })
}

fn diagnostic(message: &str, procedure: &str, params: &CallParams) -> String {
    format!(
        "{}\n SP Name: {}\n Input: {}",
        message,
        procedure,
        params.render_inputs()
    )
}

fn decimal_from_buffer(value: &DbValue) -> Option<Decimal> {
    match value {
        DbValue::Decimal(d) => Some(*d),
        DbValue::String(s) => parse_invariant_decimal(s),
        _ => None,
    }
}

/// Parse digits with an optional sign and at most one `.` separator.
///
/// Group separators, exponents and locale-specific marks are rejected. The
/// leading sign and surrounding whitespace are a deliberate widening over a
/// bare decimal-point grammar, so negative buffers are read back too.
pub(crate) fn parse_invariant_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut digits = 0usize;
    let mut points = 0usize;
    for c in unsigned.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return None,
        }
    }
    if digits == 0 || points > 1 {
        return None;
    }

    let value = Decimal::from_str(unsigned).ok()?;
    Some(if negative { -value } else { value })
}
