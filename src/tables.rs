use chrono::{Local, TimeDelta};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::izip;

use crate::{
    quantity::energy::WattHours,
    statistics::{Averages, DailyEnergy},
};

pub fn build_averages_table(averages: &Averages) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new(format!("Daily average over {} days", averages.n_days)),
        Cell::new("Energy").set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![Cell::new("Production"), energy_cell(averages.production)]);
    table.add_row(vec![Cell::new("Consumption"), energy_cell(averages.consumption)]);
    table.add_row(vec![
        Cell::new("Net"),
        energy_cell(averages.net).fg(net_color(averages.net)),
    ]);
    table.add_row(vec![
        Cell::new("Exported").fg(Color::Green),
        energy_cell(averages.exported).fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Imported").fg(Color::Red),
        energy_cell(averages.imported).fg(Color::Red),
    ]);
    table
}

pub fn build_daily_table(daily: &DailyEnergy) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Date"),
        Cell::new("Production").set_alignment(CellAlignment::Right),
        Cell::new("Consumption").set_alignment(CellAlignment::Right),
        Cell::new("Net").set_alignment(CellAlignment::Right),
        Cell::new("Exported").set_alignment(CellAlignment::Right).fg(Color::Green),
        Cell::new("Imported").set_alignment(CellAlignment::Right).fg(Color::Red),
    ]);
    for (day, (production, consumption, net, exported, imported)) in (0..).zip(izip!(
        &daily.production,
        &daily.consumption,
        &daily.net,
        &daily.exported,
        &daily.imported,
    )) {
        let date = (daily.start + TimeDelta::days(day)).with_timezone(&Local);
        table.add_row(vec![
            Cell::new(date.format("%a %b %d")).add_attribute(Attribute::Dim),
            energy_cell(*production),
            energy_cell(*consumption),
            energy_cell(*net).fg(net_color(*net)),
            energy_cell(*exported),
            energy_cell(*imported),
        ]);
    }
    table
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn energy_cell(energy: WattHours) -> Cell {
    Cell::new(energy).set_alignment(CellAlignment::Right)
}

fn net_color(net: WattHours) -> Color {
    if net > WattHours::ZERO { Color::Red } else { Color::Green }
}
