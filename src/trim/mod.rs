mod planner;

pub use planner::plan_cuts;
