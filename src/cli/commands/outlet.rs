use crate::cli::parser::{Commands, OutletAction};
use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::geo::GeoPoint;
use crate::models::outlet::Outlet;
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Outlet { action } = cmd {
        let pool = DbPool::new(&cfg.database)?;
        let conn = &pool.conn;

        match action {
            OutletAction::Add {
                id,
                name,
                lat,
                lng,
                radius,
            } => {
                // Reference data is validated once, on entry
                let center = GeoPoint::new(*lat, *lng)?;

                let outlet = Outlet {
                    id: id.clone(),
                    name: name.clone(),
                    center,
                    radius_meters: *radius,
                };

                queries::insert_outlet(conn, &outlet)?;

                ttlog(
                    conn,
                    "outlet_add",
                    id,
                    &format!("Outlet '{}' at ({}, {}) r={}m", name, lat, lng, radius),
                )?;

                success(format!(
                    "Outlet {} ({}) registered with a {} m geofence.",
                    id, name, radius
                ));
            }

            OutletAction::List => {
                let outlets = queries::list_outlets(conn)?;

                if outlets.is_empty() {
                    info("No outlets registered yet.");
                    return Ok(());
                }

                let mut table = Table::new(vec![
                    Column {
                        header: "ID".into(),
                        width: 10,
                    },
                    Column {
                        header: "Name".into(),
                        width: 24,
                    },
                    Column {
                        header: "Lat".into(),
                        width: 12,
                    },
                    Column {
                        header: "Lng".into(),
                        width: 12,
                    },
                    Column {
                        header: "Radius".into(),
                        width: 8,
                    },
                ]);

                for o in &outlets {
                    table.add_row(vec![
                        o.id.clone(),
                        o.name.clone(),
                        format!("{:.6}", o.center.lat),
                        format!("{:.6}", o.center.lng),
                        format!("{} m", o.radius_meters),
                    ]);
                }

                println!("🏬 Outlets:\n");
                print!("{}", table.render());
            }
        }
    }

    Ok(())
}
