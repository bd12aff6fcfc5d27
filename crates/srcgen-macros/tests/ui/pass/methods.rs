use srcgen_macros::my_special;

pub struct TestClass;

impl TestClass {
    #[my_special]
    pub fn test_method() {}

    #[my_special]
    pub fn instance_method(&self) -> u8 {
        1
    }
}

pub trait Job {
    #[my_special]
    fn run();

    #[my_special]
    fn describe() -> &'static str {
        "job"
    }
}

impl Job for TestClass {
    #[srcgen_macros::my_special]
    fn run() {}
}

fn main() {
    TestClass::test_method();
    TestClass::run();
    assert_eq!(TestClass.instance_method(), 1);
    assert_eq!(TestClass::describe(), "job");
}
