use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use dotenvy::dotenv;
use std::sync::Arc;
use tokio_cron_scheduler::Job;
use tracing::info;

use shelfwatch_engine::api;
use shelfwatch_engine::jobs::{self, JobContext};
use shelfwatch_engine::maintenance::RetentionPolicy;
use shelfwatch_engine::monitoring::metrics::register_all;
use shelfwatch_engine::scheduler::{built_in_jobs, run_guarded, JobGuard, SchedulerHandle};

mod config;
use config::AppContext;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    shelfwatch_engine::logging::init();

    let mut context = AppContext::new()
        .await
        .map_err(|e| std::io::Error::other(format!("failed to bootstrap application: {e}")))?;

    register_all().map_err(|e| std::io::Error::other(format!("failed to register metrics: {e}")))?;

    let server_url = context.server_address();
    info!("Starting shelfwatch-engine at http://{server_url}");
    info!("Built-in scheduler jobs: {}", built_in_jobs().len());

    let analytics_rx = context.analytics_events.take().expect("analytics receiver taken exactly once");
    tokio::spawn(jobs::analytics_rollup::run_consumer(context.job_context.clone(), analytics_rx));

    let scheduler = SchedulerHandle::new(
        tokio_cron_scheduler::JobScheduler::new()
            .await
            .map_err(|e| std::io::Error::other(format!("failed to start scheduler: {e}")))?,
    );

    register_jobs(&scheduler.scheduler, context.job_context.clone(), context.job_guard.clone(), &context.config)
        .await
        .map_err(|e| std::io::Error::other(format!("failed to register scheduled jobs: {e}")))?;

    scheduler
        .scheduler
        .start()
        .await
        .map_err(|e| std::io::Error::other(format!("failed to start scheduler loop: {e}")))?;

    let pool = context.database_pool.clone();

    HttpServer::new(move || {
        let cors = Cors::default().allow_any_origin().allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(web::Data::from(pool.clone()))
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .configure(api::init_routes)
    })
    .bind(server_url)?
    .run()
    .await
}

/// Installs every entry from [`built_in_jobs`] onto `scheduler`, each
/// wrapped in [`run_guarded`] so an overrunning tick is skipped rather than
/// queued behind the previous run.
async fn register_jobs(
    scheduler: &tokio_cron_scheduler::JobScheduler,
    ctx: JobContext,
    guard: Arc<JobGuard>,
    config: &shelfwatch_core::config::Config,
) -> Result<(), tokio_cron_scheduler::JobSchedulerError> {
    let max_attempts = config.throttle_defaults.max_attempts;
    let retention = RetentionPolicy { history_days: 90, log_days: 14 };
    let backup_config = config.backup.clone();
    let database_url = config.database.database_url.clone();
    let prowlarr_url = config.prowlarr.url.clone();

    for job in built_in_jobs() {
        let ctx = ctx.clone();
        let guard = guard.clone();
        let name = job.name;

        let cron_job = match name {
            "throttle-window-reset" => Job::new_async(job.cron_expression, move |_uuid, _l| {
                let ctx = ctx.clone();
                let guard = guard.clone();
                Box::pin(async move {
                    run_guarded(&guard, name, |_cid| async move {
                        if let Err(e) = jobs::throttle_reset::run(&ctx).await {
                            tracing::error!(error = %e, "throttle-window-reset failed");
                        }
                    })
                    .await;
                })
            })?,
            "prowlarr-health-check" => {
                let prowlarr_url = prowlarr_url.clone();
                Job::new_async(job.cron_expression, move |_uuid, _l| {
                    let guard = guard.clone();
                    let prowlarr_url = prowlarr_url.clone();
                    Box::pin(async move {
                        run_guarded(&guard, name, |_cid| async move {
                            let _ = jobs::connector_health::run_prowlarr_check(prowlarr_url.as_deref()).await;
                        })
                        .await;
                    })
                })?
            }
            "connector-health-check" => Job::new_async(job.cron_expression, move |_uuid, _l| {
                let ctx = ctx.clone();
                let guard = guard.clone();
                Box::pin(async move {
                    run_guarded(&guard, name, |_cid| async move {
                        if let Err(e) = jobs::connector_health::run(&ctx).await {
                            tracing::error!(error = %e, "connector-health-check failed");
                        }
                    })
                    .await;
                })
            })?,
            "connector-reconnect" => Job::new_async(job.cron_expression, move |_uuid, _l| {
                let ctx = ctx.clone();
                let guard = guard.clone();
                Box::pin(async move {
                    run_guarded(&guard, name, |_cid| async move {
                        if let Err(e) = jobs::reconnect::run(&ctx).await {
                            tracing::error!(error = %e, "connector-reconnect failed");
                        }
                    })
                    .await;
                })
            })?,
            "incremental-sync-sweep" => Job::new_async(job.cron_expression, move |_uuid, _l| {
                let ctx = ctx.clone();
                let guard = guard.clone();
                Box::pin(async move {
                    run_guarded(&guard, name, |_cid| async move {
                        if let Err(e) = jobs::sync::run_incremental(&ctx).await {
                            tracing::error!(error = %e, "incremental-sync-sweep failed");
                        }
                    })
                    .await;
                })
            })?,
            "full-reconciliation" => Job::new_async(job.cron_expression, move |_uuid, _l| {
                let ctx = ctx.clone();
                let guard = guard.clone();
                Box::pin(async move {
                    run_guarded(&guard, name, |_cid| async move {
                        if let Err(e) = jobs::sync::run_full_reconciliation(&ctx).await {
                            tracing::error!(error = %e, "full-reconciliation failed");
                        }
                    })
                    .await;
                })
            })?,
            "completion-snapshot" => Job::new_async(job.cron_expression, move |_uuid, _l| {
                let ctx = ctx.clone();
                let guard = guard.clone();
                Box::pin(async move {
                    run_guarded(&guard, name, |_cid| async move {
                        if let Err(e) = jobs::sync::run_completion_snapshot(&ctx).await {
                            tracing::error!(error = %e, "completion-snapshot failed");
                        }
                    })
                    .await;
                })
            })?,
            "db-maintenance" => Job::new_async(job.cron_expression, move |_uuid, _l| {
                let ctx = ctx.clone();
                let guard = guard.clone();
                Box::pin(async move {
                    run_guarded(&guard, name, |_cid| async move {
                        if let Err(e) = jobs::maintenance::run(&ctx, retention).await {
                            tracing::error!(error = %e, "db-maintenance failed");
                        }
                    })
                    .await;
                })
            })?,
            "queue-processor" => Job::new_async(job.cron_expression, move |_uuid, _l| {
                let ctx = ctx.clone();
                let guard = guard.clone();
                Box::pin(async move {
                    run_guarded(&guard, name, |_cid| async move {
                        if let Err(e) = jobs::queue_processor::run(&ctx, max_attempts).await {
                            tracing::error!(error = %e, "queue-processor failed");
                        }
                    })
                    .await;
                })
            })?,
            "notification-batch-processor" => Job::new_async(job.cron_expression, move |_uuid, _l| {
                let ctx = ctx.clone();
                let guard = guard.clone();
                Box::pin(async move {
                    run_guarded(&guard, name, |_cid| async move {
                        if let Err(e) = jobs::notifications::run(&ctx).await {
                            tracing::error!(error = %e, "notification-batch-processor failed");
                        }
                    })
                    .await;
                })
            })?,
            "queue-depth-sampler" => Job::new_async(job.cron_expression, move |_uuid, _l| {
                let ctx = ctx.clone();
                let guard = guard.clone();
                Box::pin(async move {
                    run_guarded(&guard, name, |_cid| async move {
                        if let Err(e) = jobs::queue_processor::run_depth_sampler(&ctx).await {
                            tracing::error!(error = %e, "queue-depth-sampler failed");
                        }
                    })
                    .await;
                })
            })?,
            "analytics-hourly-aggregation" => Job::new_async(job.cron_expression, move |_uuid, _l| {
                let ctx = ctx.clone();
                let guard = guard.clone();
                Box::pin(async move {
                    run_guarded(&guard, name, |_cid| async move {
                        if let Err(e) = jobs::analytics_rollup::run_hourly_aggregation(&ctx).await {
                            tracing::error!(error = %e, "analytics-hourly-aggregation failed");
                        }
                    })
                    .await;
                })
            })?,
            "analytics-daily-aggregation" => Job::new_async(job.cron_expression, move |_uuid, _l| {
                let ctx = ctx.clone();
                let guard = guard.clone();
                Box::pin(async move {
                    run_guarded(&guard, name, |_cid| async move {
                        if let Err(e) = jobs::analytics_rollup::run_daily_aggregation(&ctx).await {
                            tracing::error!(error = %e, "analytics-daily-aggregation failed");
                        }
                    })
                    .await;
                })
            })?,
            "scheduled-backup" => {
                let backup_config = backup_config.clone();
                let database_url = database_url.clone();
                Job::new_async(job.cron_expression, move |_uuid, _l| {
                    let guard = guard.clone();
                    let backup_config = backup_config.clone();
                    let database_url = database_url.clone();
                    Box::pin(async move {
                        run_guarded(&guard, name, |_cid| async move {
                            if let Err(e) = jobs::backup::run(&backup_config, &database_url).await {
                                tracing::error!(error = %e, "scheduled-backup failed");
                            }
                        })
                        .await;
                    })
                })?
            }
            other => {
                tracing::warn!(job = other, "no job body registered for built-in job definition, skipping");
                continue;
            }
        };

        scheduler.add(cron_job).await?;
    }

    Ok(())
}
