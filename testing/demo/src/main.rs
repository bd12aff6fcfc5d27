use srcgen_demo::generated::CallerTypeNameExtensions;

fn main() {
    CallerTypeNameExtensions::do_something_caller_type_name();
    CallerTypeNameExtensions::jobs_nightly_run_caller_type_name();
    CallerTypeNameExtensions::jobs_hourly_run_caller_type_name();
    CallerTypeNameExtensions::schedule_caller_type_name();
}
