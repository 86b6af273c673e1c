use std::sync::Arc;

use crate::{
    Config,
    binder::{Action, Binder, Completion, Effect},
    fetcher::WeatherFetcher,
    position::FixedPosition,
    provider::{WeatherApi, api_from_config},
    resolver::LocationResolver,
};

/// Runs binder effects one after another against the resolver and fetcher.
#[derive(Debug, Clone)]
pub struct EffectRunner {
    resolver: LocationResolver,
    fetcher: WeatherFetcher,
}

impl EffectRunner {
    pub fn new(resolver: LocationResolver, fetcher: WeatherFetcher) -> Self {
        Self { resolver, fetcher }
    }

    /// Wire the upstream client and, when a home position is configured,
    /// a fixed position source.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api = api_from_config(config)?;
        Ok(Self::with_api(api, config))
    }

    pub fn with_api(api: Arc<dyn WeatherApi>, config: &Config) -> Self {
        let mut resolver = LocationResolver::new(api.clone());
        if let Some(home) = config.home_coordinates() {
            resolver = resolver.with_position_source(Arc::new(FixedPosition(home)));
        }
        Self::new(resolver, WeatherFetcher::new(api))
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    /// A fresh binder that knows whether geolocation is available.
    pub fn binder(&self) -> Binder {
        Binder::new(self.resolver.supports_geolocation())
    }

    pub async fn run(&self, effect: Effect) -> Completion {
        match effect {
            Effect::LocateDevice { ticket } => {
                Completion::Located { ticket, result: self.resolver.locate().await }
            }
            Effect::FetchWeather { ticket, query } => {
                Completion::Fetched { ticket, result: self.fetcher.fetch(&query).await }
            }
        }
    }

    /// Apply `action` and keep running effects until the binder settles.
    pub async fn dispatch(&self, binder: &mut Binder, action: Action) {
        let mut next = binder.handle(action);
        while let Some(effect) = next {
            let done = self.run(effect).await;
            next = binder.complete(done);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        binder::{MSG_GEOLOCATION_UNSUPPORTED, MSG_NO_LOCATION, MSG_NOT_FOUND},
        config::HomePosition,
        model::Coordinates,
        testing::{FakeApi, GeoReply, WeatherReply, candidate, snapshot},
    };

    #[tokio::test]
    async fn search_by_text_runs_to_success() {
        let api = Arc::new(
            FakeApi::default()
                .with_geocode(GeoReply::Found(vec![candidate("Paris", "FR")]))
                .with_weather(WeatherReply::Snapshot(snapshot("Paris"))),
        );
        let runner = EffectRunner::with_api(api.clone(), &Config::default());
        let mut binder = runner.binder();

        runner.dispatch(&mut binder, Action::EnterText("Paris".into())).await;
        runner.dispatch(&mut binder, Action::Search).await;

        assert_eq!(binder.view().snapshot().map(|s| s.location_name.as_str()), Some("Paris"));
        assert_eq!(api.geocode_calls(), 1);
        assert_eq!(api.weather_calls(), 1);
    }

    #[tokio::test]
    async fn unknown_place_ends_in_error() {
        let api = Arc::new(FakeApi::default().with_geocode(GeoReply::Found(vec![])));
        let runner = EffectRunner::with_api(api.clone(), &Config::default());
        let mut binder = runner.binder();

        runner.dispatch(&mut binder, Action::EnterText("zzzNotAPlace".into())).await;
        runner.dispatch(&mut binder, Action::Search).await;

        assert_eq!(binder.view().error(), Some(MSG_NOT_FOUND));
        assert!(binder.view().snapshot().is_none());
        assert_eq!(api.weather_calls(), 0);
    }

    #[tokio::test]
    async fn search_without_location_makes_no_calls() {
        let api = Arc::new(FakeApi::default());
        let runner = EffectRunner::with_api(api.clone(), &Config::default());
        let mut binder = runner.binder();

        runner.dispatch(&mut binder, Action::Search).await;

        assert_eq!(binder.view().error(), Some(MSG_NO_LOCATION));
        assert_eq!(api.geocode_calls() + api.weather_calls(), 0);
    }

    #[tokio::test]
    async fn current_location_needs_a_position_source() {
        let api = Arc::new(FakeApi::default());
        let runner = EffectRunner::with_api(api.clone(), &Config::default());
        let mut binder = runner.binder();

        runner.dispatch(&mut binder, Action::UseCurrentLocation).await;

        assert_eq!(binder.view().error(), Some(MSG_GEOLOCATION_UNSUPPORTED));
        assert_eq!(api.geocode_calls() + api.weather_calls(), 0);
    }

    #[tokio::test]
    async fn configured_home_answers_current_location() {
        let api = Arc::new(FakeApi::default().with_weather(WeatherReply::Snapshot(snapshot("Home"))));
        let config = Config {
            home: Some(HomePosition { latitude: 40.4, longitude: -3.7 }),
            ..Config::default()
        };
        let runner = EffectRunner::with_api(api.clone(), &config);
        let mut binder = runner.binder();

        runner.dispatch(&mut binder, Action::UseCurrentLocation).await;

        assert_eq!(binder.view().snapshot().map(|s| s.location_name.as_str()), Some("Home"));
        assert_eq!(api.last_weather_coordinates(), Some(Coordinates::new(40.4, -3.7)));
        assert_eq!(api.geocode_calls(), 0);
    }
}
