fn main() {
    // Propagates ESP-IDF cfg/link args when building for the device;
    // prints nothing for host-target builds.
    embuild::espidf::sysenv::output();
}
