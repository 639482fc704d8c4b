//! Weather and encyclopedia lookups

use super::{ActionContext, ActionResult, Args};
use crate::Error;

pub(super) async fn weather(args: &Args, ctx: &ActionContext) -> ActionResult {
    let Some(provider) = &ctx.weather else {
        return ActionResult::unavailable(
            "Weather functionality requires an API key. \
             Please add your OpenWeatherMap API key to the configuration.",
        );
    };
    let Some(city) = args.text("city") else {
        return ActionResult::invalid("Which city's weather would you like to know?");
    };

    match provider.current(city).await {
        Ok(report) => ActionResult::success(format!(
            "The weather in {}: {:.0} degrees celsius with {}. Humidity is {} percent.",
            report.city, report.temperature_c, report.description, report.humidity
        )),
        Err(Error::NotFound(_)) => {
            ActionResult::not_found(format!("I couldn't find the weather for {city}."))
        }
        Err(e) => {
            tracing::warn!(city, error = %e, "weather lookup failed");
            ActionResult::unavailable("I'm having trouble connecting to the weather service.")
        }
    }
}

pub(super) async fn encyclopedia(args: &Args, ctx: &ActionContext) -> ActionResult {
    let Some(query) = args.text("query") else {
        return ActionResult::invalid("What would you like me to look up?");
    };

    match ctx.encyclopedia.summary(query).await {
        Ok(summary) => ActionResult::success(format!("Here's what I found: {summary}")),
        Err(Error::NotFound(_)) => ActionResult::not_found(format!(
            "I couldn't find information about {query} on Wikipedia."
        )),
        Err(e) => {
            tracing::warn!(query, error = %e, "encyclopedia lookup failed");
            ActionResult::unavailable(format!(
                "I couldn't reach Wikipedia to look up {query}."
            ))
        }
    }
}
