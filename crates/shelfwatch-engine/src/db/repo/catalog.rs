//! Catalog mirror: series/episodes/movies upserted from `UpstreamClient`
//! listings, keyed by `(connector_id, upstream_id)`.

use chrono::Utc;
use diesel::prelude::*;
use shelfwatch_core::error::EngineError;
use shelfwatch_core::models::ContentType;
use shelfwatch_connectors::client::{RemoteEpisode, RemoteMovie, RemoteSeries};
use uuid::Uuid;

use crate::db::models::{EpisodeRow, MovieRow, NewEpisode, NewMovie, NewSeries, SeriesRow};
use crate::db::schema::{episodes, movies, series};
use crate::db::{run_blocking, DbPool};

/// The upstream numeric id backing a mirrored episode or movie row, looked
/// up by its local id. Dispatch needs this to call the upstream search API,
/// which only knows its own ids.
pub async fn upstream_id_for(pool: &DbPool, content_type: ContentType, content_id: Uuid) -> Result<Option<i64>, EngineError> {
    run_blocking(pool, move |conn| match content_type {
        ContentType::Episode => Ok(episodes::table.find(content_id).select(episodes::upstream_id).first::<i64>(conn).optional()?),
        ContentType::Movie => Ok(movies::table.find(content_id).select(movies::upstream_id).first::<i64>(conn).optional()?),
    })
    .await
}

pub async fn known_series_upstream_ids(pool: &DbPool, connector_id: Uuid) -> Result<Vec<i64>, EngineError> {
    run_blocking(pool, move |conn| {
        Ok(series::table.filter(series::connector_id.eq(connector_id)).select(series::upstream_id).load::<i64>(conn)?)
    })
    .await
}

pub async fn known_movie_upstream_ids(pool: &DbPool, connector_id: Uuid) -> Result<Vec<i64>, EngineError> {
    run_blocking(pool, move |conn| {
        Ok(movies::table.filter(movies::connector_id.eq(connector_id)).select(movies::upstream_id).load::<i64>(conn)?)
    })
    .await
}

pub async fn upsert_series(pool: &DbPool, connector_id: Uuid, remote: Vec<RemoteSeries>) -> Result<Vec<SeriesRow>, EngineError> {
    run_blocking(pool, move |conn| {
        let now = Utc::now();
        let mut out = Vec::with_capacity(remote.len());
        for item in remote {
            let new_row = NewSeries {
                id: Uuid::new_v4(),
                connector_id,
                upstream_id: item.id,
                title: item.title,
                monitored: item.monitored,
                created_at: now,
                updated_at: now,
            };
            let row = diesel::insert_into(series::table)
                .values(&new_row)
                .on_conflict((series::connector_id, series::upstream_id))
                .do_update()
                .set((series::title.eq(&new_row.title), series::monitored.eq(new_row.monitored), series::updated_at.eq(now)))
                .get_result::<SeriesRow>(conn)?;
            out.push(row);
        }
        Ok(out)
    })
    .await
}

pub async fn upsert_movies(pool: &DbPool, connector_id: Uuid, remote: Vec<RemoteMovie>) -> Result<Vec<MovieRow>, EngineError> {
    run_blocking(pool, move |conn| {
        let now = Utc::now();
        let mut out = Vec::with_capacity(remote.len());
        for item in remote {
            let new_row = NewMovie {
                id: Uuid::new_v4(),
                connector_id,
                upstream_id: item.id,
                title: item.title,
                has_file: item.has_file,
                monitored: item.monitored,
                quality_cutoff_not_met: item.quality_cutoff_not_met,
                quality: None,
                created_at: now,
                updated_at: now,
            };
            let row = diesel::insert_into(movies::table)
                .values(&new_row)
                .on_conflict((movies::connector_id, movies::upstream_id))
                .do_update()
                .set((
                    movies::title.eq(&new_row.title),
                    movies::has_file.eq(new_row.has_file),
                    movies::monitored.eq(new_row.monitored),
                    movies::quality_cutoff_not_met.eq(new_row.quality_cutoff_not_met),
                    movies::updated_at.eq(now),
                ))
                .get_result::<MovieRow>(conn)?;
            out.push(row);
        }
        Ok(out)
    })
    .await
}

/// `series_id` is the local row id, resolved by the caller from the series
/// upsert results before fetching that series' episode listing.
pub async fn upsert_episodes(
    pool: &DbPool,
    connector_id: Uuid,
    series_id: Uuid,
    remote: Vec<RemoteEpisode>,
) -> Result<Vec<EpisodeRow>, EngineError> {
    run_blocking(pool, move |conn| {
        let now = Utc::now();
        let mut out = Vec::with_capacity(remote.len());
        for item in remote {
            let new_row = NewEpisode {
                id: Uuid::new_v4(),
                connector_id,
                upstream_id: item.id,
                series_id,
                season_number: item.season_number,
                episode_number: item.episode_number,
                has_file: item.has_file,
                monitored: item.monitored,
                quality_cutoff_not_met: item.quality_cutoff_not_met,
                quality: None,
                created_at: now,
                updated_at: now,
            };
            let row = diesel::insert_into(episodes::table)
                .values(&new_row)
                .on_conflict((episodes::connector_id, episodes::upstream_id))
                .do_update()
                .set((
                    episodes::has_file.eq(new_row.has_file),
                    episodes::monitored.eq(new_row.monitored),
                    episodes::quality_cutoff_not_met.eq(new_row.quality_cutoff_not_met),
                    episodes::updated_at.eq(now),
                ))
                .get_result::<EpisodeRow>(conn)?;
            out.push(row);
        }
        Ok(out)
    })
    .await
}

pub async fn delete_stale_series(pool: &DbPool, connector_id: Uuid, upstream_ids: Vec<i64>) -> Result<usize, EngineError> {
    if upstream_ids.is_empty() {
        return Ok(0);
    }
    run_blocking(pool, move |conn| {
        Ok(diesel::delete(
            series::table.filter(series::connector_id.eq(connector_id)).filter(series::upstream_id.eq_any(upstream_ids)),
        )
        .execute(conn)?)
    })
    .await
}

pub async fn delete_stale_movies(pool: &DbPool, connector_id: Uuid, upstream_ids: Vec<i64>) -> Result<usize, EngineError> {
    if upstream_ids.is_empty() {
        return Ok(0);
    }
    run_blocking(pool, move |conn| {
        Ok(diesel::delete(
            movies::table.filter(movies::connector_id.eq(connector_id)).filter(movies::upstream_id.eq_any(upstream_ids)),
        )
        .execute(conn)?)
    })
    .await
}

pub async fn list_series(pool: &DbPool, connector_id: Uuid) -> Result<Vec<SeriesRow>, EngineError> {
    run_blocking(pool, move |conn| Ok(series::table.filter(series::connector_id.eq(connector_id)).load::<SeriesRow>(conn)?)).await
}

pub async fn list_movies(pool: &DbPool, connector_id: Uuid) -> Result<Vec<MovieRow>, EngineError> {
    run_blocking(pool, move |conn| Ok(movies::table.filter(movies::connector_id.eq(connector_id)).load::<MovieRow>(conn)?)).await
}

pub async fn list_episodes(pool: &DbPool, connector_id: Uuid) -> Result<Vec<EpisodeRow>, EngineError> {
    run_blocking(pool, move |conn| Ok(episodes::table.filter(episodes::connector_id.eq(connector_id)).load::<EpisodeRow>(conn)?))
        .await
}
