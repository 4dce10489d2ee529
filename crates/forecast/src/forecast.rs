use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use stockwork_core::{
    CompanyId, DomainError, DomainResult, Entity, ForecastId, LocationId, MoveId, ProductId, Uom,
};
use stockwork_products::Product;
use stockwork_stock::{Location, LocationKind, Move, MoveOrigin, MoveRepository, MoveState};

use crate::distribute::distribute;

/// Forecast lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastState {
    Draft,
    Confirmed,
    Done,
    Cancel,
}

/// Expected demand for one product over the forecast period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastLine {
    pub product: ProductId,
    pub quantity: f64,
    pub uom: Uom,
    /// Moves are planned in multiples of this quantity.
    pub minimal_quantity: f64,
    /// Moves planned for this line by [`Forecast::create_moves`].
    pub moves: Vec<MoveId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    id: ForecastId,
    company: CompanyId,
    warehouse: LocationId,
    storage: LocationId,
    destination: LocationId,
    destination_is_customer: bool,
    from_date: NaiveDate,
    to_date: NaiveDate,
    state: ForecastState,
    lines: Vec<ForecastLine>,
}

impl Forecast {
    pub fn new(
        company: CompanyId,
        warehouse: &Location,
        destination: &Location,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> DomainResult<Self> {
        if warehouse.kind != LocationKind::Warehouse {
            return Err(DomainError::validation(format!("{} is not a warehouse", warehouse.name)));
        }
        let storage = warehouse.storage.ok_or_else(|| {
            DomainError::validation(format!("warehouse {} has no storage location", warehouse.name))
        })?;
        if to_date < from_date {
            return Err(DomainError::validation("\"To Date\" must be greater than \"From Date\""));
        }
        Ok(Self {
            id: ForecastId::new(),
            company,
            warehouse: warehouse.id,
            storage,
            destination: destination.id,
            destination_is_customer: destination.is_customer(),
            from_date,
            to_date,
            state: ForecastState::Draft,
            lines: Vec::new(),
        })
    }

    pub fn company(&self) -> CompanyId {
        self.company
    }

    pub fn warehouse(&self) -> LocationId {
        self.warehouse
    }

    pub fn state(&self) -> ForecastState {
        self.state
    }

    pub fn lines(&self) -> &[ForecastLine] {
        &self.lines
    }

    /// Number of days covered, both bounds included.
    pub fn days(&self) -> u32 {
        u32::try_from((self.to_date - self.from_date).num_days() + 1).unwrap_or(u32::MAX)
    }

    pub fn add_line(
        &mut self,
        product: ProductId,
        quantity: f64,
        uom: Uom,
        minimal_quantity: f64,
    ) -> DomainResult<usize> {
        if self.state != ForecastState::Draft {
            return Err(DomainError::conflict("lines can only be added to a draft forecast"));
        }
        if quantity < 0.0 {
            return Err(DomainError::validation("line quantity must be positive"));
        }
        if minimal_quantity <= 0.0 {
            return Err(DomainError::validation("minimal quantity must be greater than 0"));
        }
        self.lines.push(ForecastLine {
            product,
            quantity,
            uom,
            minimal_quantity,
            moves: Vec::new(),
        });
        Ok(self.lines.len() - 1)
    }

    pub fn confirm(&mut self) -> DomainResult<()> {
        self.transition(ForecastState::Draft, ForecastState::Confirmed)
    }

    pub fn done(&mut self) -> DomainResult<()> {
        self.transition(ForecastState::Confirmed, ForecastState::Done)
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        if matches!(self.state, ForecastState::Done | ForecastState::Cancel) {
            return Err(DomainError::conflict(format!(
                "cannot cancel a forecast in state {:?}",
                self.state
            )));
        }
        self.state = ForecastState::Cancel;
        Ok(())
    }

    fn transition(&mut self, from: ForecastState, to: ForecastState) -> DomainResult<()> {
        if self.state != from {
            return Err(DomainError::conflict(format!(
                "cannot go from {:?} to {to:?}",
                self.state
            )));
        }
        self.state = to;
        Ok(())
    }

    /// Whether `mv` fulfils demand of `line` without having been planned by a
    /// forecast.
    fn executes(&self, line: &ForecastLine, mv: &Move) -> bool {
        mv.product == line.product
            && mv.from_location == self.storage
            && mv.to_location == self.destination
            && mv.state != MoveState::Cancel
            && mv.origin != MoveOrigin::Forecast
            && mv
                .planned_date
                .is_some_and(|date| date >= self.from_date && date <= self.to_date)
    }

    /// Quantity of line `index` already covered by recorded moves, in the
    /// line's unit.
    pub fn quantity_executed(&self, index: usize, moves: &[Move]) -> DomainResult<f64> {
        let line = self.line(index)?;
        moves
            .iter()
            .filter(|mv| self.executes(line, mv))
            .try_fold(0.0, |total, mv| {
                Ok(total + Uom::compute_qty(&mv.uom, mv.quantity, &line.uom, true)?)
            })
    }

    fn line(&self, index: usize) -> DomainResult<&ForecastLine> {
        self.lines
            .get(index)
            .ok_or_else(|| DomainError::not_found(format!("forecast line {index}")))
    }

    /// Plan moves covering what recorded moves have not executed yet.
    ///
    /// Previously planned moves are deleted first. Planned moves are drafts
    /// from the warehouse storage to the destination, one per day that gets at
    /// least one packet.
    pub fn create_moves<R>(
        &mut self,
        repo: &R,
        products: &HashMap<ProductId, Product>,
    ) -> DomainResult<Vec<MoveId>>
    where
        R: MoveRepository + ?Sized,
    {
        if self.state != ForecastState::Confirmed {
            return Err(DomainError::conflict("moves can only be created for a confirmed forecast"));
        }
        self.delete_moves(repo)?;

        let days = self.days();
        let mut created = Vec::new();
        for index in 0..self.lines.len() {
            let line = &self.lines[index];
            let product = products
                .get(&line.product)
                .ok_or_else(|| DomainError::not_found(format!("product {}", line.product)))?;

            let recorded = repo.search(&|mv: &Move| self.executes(line, mv));
            let executed = self.quantity_executed(index, &recorded)?;
            let packets = ((line.quantity - executed) / line.minimal_quantity).floor().max(0.0) as u64;
            debug!(product_id = %line.product, executed, packets, "planning forecast line");

            let unit_price = if self.destination_is_customer {
                Some(Uom::compute_price(product.default_uom(), product.list_price(), &line.uom)?)
            } else {
                None
            };

            let mut line_moves = Vec::new();
            for (day, count) in distribute(days, packets)? {
                if count == 0 {
                    continue;
                }
                let mut mv = Move::new(
                    line.product,
                    self.company,
                    self.storage,
                    self.destination,
                    line.uom.clone(),
                    count as f64 * line.minimal_quantity,
                )
                .with_planned_date(self.from_date + Duration::days(i64::from(day)))
                .with_origin(MoveOrigin::Forecast);
                if let Some(price) = unit_price {
                    mv = mv.with_unit_price(price);
                }
                line_moves.push(repo.create(mv)?);
            }

            created.extend(line_moves.iter().copied());
            self.lines[index].moves = line_moves;
        }

        info!(forecast_id = %self.id, moves = created.len(), "created forecast moves");
        Ok(created)
    }

    /// Delete every move planned by this forecast.
    pub fn delete_moves<R>(&mut self, repo: &R) -> DomainResult<()>
    where
        R: MoveRepository + ?Sized,
    {
        let ids: Vec<MoveId> = self.lines.iter().flat_map(|l| l.moves.iter().copied()).collect();
        if ids.is_empty() {
            return Ok(());
        }
        repo.delete(&ids)?;
        for line in &mut self.lines {
            line.moves.clear();
        }
        debug!(forecast_id = %self.id, moves = ids.len(), "deleted forecast moves");
        Ok(())
    }
}

impl Entity for Forecast {
    type Id = ForecastId;

    fn id(&self) -> ForecastId {
        self.id
    }
}
